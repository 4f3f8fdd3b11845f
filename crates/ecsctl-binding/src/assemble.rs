//! Nested request assembly.
//!
//! A [`NestedBuilder`] wraps one nested request object and remembers whether
//! anything was ever assigned to it. [`NestedBuilder::build`] yields `None`
//! for an untouched object, so a parent that assigns the result through
//! [`NestedBuilder::set`] stays untouched too. Empty sub-trees collapse
//! bottom-up and never reach the wire as `{}`.

#[derive(Debug)]
pub struct NestedBuilder<T> {
    inner: T,
    is_null: bool,
}

impl<T: Default> Default for NestedBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> NestedBuilder<T> {
    pub fn new() -> Self {
        Self {
            inner: T::default(),
            is_null: true,
        }
    }
}

impl<T> NestedBuilder<T> {
    /// Assign `value` through `assign` if it is present.
    ///
    /// Works for leaves and for child objects alike: pass a child's
    /// `build()` result and an absent child leaves this builder untouched.
    pub fn set<V>(&mut self, value: Option<V>, assign: impl FnOnce(&mut T, V)) -> &mut Self {
        if let Some(value) = value {
            assign(&mut self.inner, value);
            self.is_null = false;
        }
        self
    }

    pub fn is_null(&self) -> bool {
        self.is_null
    }

    pub fn build(self) -> Option<T> {
        if self.is_null {
            None
        } else {
            Some(self.inner)
        }
    }
}

/// Build one nested object in a closure.
///
/// ```
/// use ecsctl_binding::nested;
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Breaker { enable: Option<bool>, rollback: Option<bool> }
///
/// let none = nested::<Breaker>(|b| { b.set(None::<bool>, |x, v| x.enable = Some(v)); });
/// assert_eq!(none, None);
///
/// let some = nested::<Breaker>(|b| { b.set(Some(true), |x, v| x.rollback = Some(v)); });
/// assert_eq!(some, Some(Breaker { enable: None, rollback: Some(true) }));
/// ```
pub fn nested<T: Default>(fill: impl FnOnce(&mut NestedBuilder<T>)) -> Option<T> {
    let mut builder = NestedBuilder::new();
    fill(&mut builder);
    builder.build()
}
