//! Output selection.
//!
//! Each command names the response members it can project through a
//! [`Projection`] enum (usually generated with [`projection!`]). A
//! [`Selector`] is resolved once from the `--select` text before anything is
//! sent, and applied to the decoded response afterwards.

use crate::context::Context;
use crate::descriptor::CommandDescriptor;
use crate::error::BindError;
use serde::Serialize;
use serde_json::Value;

/// The selectable top-level members of one response type.
pub trait Projection: Copy + Send + Sync + 'static {
    type Response: Serialize;

    /// Member names as shown to users, with the variant they select.
    const FIELDS: &'static [(&'static str, Self)];

    fn project(self, response: &Self::Response) -> Value;

    fn from_name(name: &str) -> Option<Self> {
        Self::FIELDS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, f)| *f)
    }

    fn names() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|(n, _)| *n).collect()
    }
}

/// Declare a [`Projection`] enum whose variants map to response fields.
///
/// ```ignore
/// projection! {
///     pub enum CreateServiceField for CreateServiceResponse {
///         Service => service,
///     }
/// }
/// ```
#[macro_export]
macro_rules! projection {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $response:ty {
            $($variant:ident => $field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::select::Projection for $name {
            type Response = $response;

            const FIELDS: &'static [(&'static str, Self)] = &[
                $((stringify!($variant), $name::$variant)),+
            ];

            fn project(self, response: &Self::Response) -> $crate::serde_json::Value {
                match self {
                    $($name::$variant => $crate::serde_json::to_value(&response.$field)
                        .unwrap_or($crate::serde_json::Value::Null)),+
                }
            }
        }
    };
}

/// What to return from an invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector<F> {
    /// `*`: the whole response.
    Whole,
    /// `Field` or `Field.sub.path`.
    Field { field: F, path: Vec<String> },
    /// `^Param`: the bound value of an input parameter.
    Echo(&'static str),
}

impl<F: Projection> Selector<F> {
    /// Parse selector text against a command. Fails on unknown members or
    /// parameters, so a bad selector never reaches the network.
    pub fn resolve(text: &str, descriptor: &'static CommandDescriptor) -> Result<Self, BindError> {
        let text = text.trim();
        let invalid = |reason: String| BindError::InvalidSelector {
            selector: text.to_string(),
            reason,
        };

        if text == "*" {
            return Ok(Self::Whole);
        }
        if let Some(param) = text.strip_prefix('^') {
            let spec = descriptor.param(param.trim()).ok_or_else(|| {
                invalid(format!("{} has no parameter '{}'", descriptor.name, param))
            })?;
            return Ok(Self::Echo(spec.name));
        }

        let mut segments = text.split('.');
        let head = segments.next().unwrap_or_default();
        if head.is_empty() {
            return Err(invalid("empty selector".to_string()));
        }
        let field = F::from_name(head).ok_or_else(|| {
            let names = F::names();
            if names.is_empty() {
                invalid(format!("{} returns no selectable members; use '*'", descriptor.name))
            } else {
                invalid(format!("expected '*', '^Parameter' or one of: {}", names.join(", ")))
            }
        })?;
        let path: Vec<String> = segments.map(str::to_string).collect();
        if path.iter().any(String::is_empty) {
            return Err(invalid("empty path segment".to_string()));
        }
        Ok(Self::Field { field, path })
    }

    pub fn apply(&self, response: &F::Response, context: &Context) -> Value {
        match self {
            Self::Whole => serde_json::to_value(response).unwrap_or(Value::Null),
            Self::Field { field, path } => {
                let value = field.project(response);
                path.iter().fold(value, |value, segment| descend(value, segment))
            }
            Self::Echo(param) => context.value(param).cloned().unwrap_or(Value::Null),
        }
    }
}

/// Step one path segment into `value`. Object keys match case-insensitively;
/// on arrays a numeric segment indexes and anything else maps over elements.
fn descend(value: Value, segment: &str) -> Value {
    match value {
        Value::Object(mut entries) => {
            let key = entries
                .keys()
                .find(|k| k.eq_ignore_ascii_case(segment))
                .cloned();
            key.and_then(|k| entries.remove(&k)).unwrap_or(Value::Null)
        }
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => items.into_iter().nth(index).unwrap_or(Value::Null),
            Err(_) => Value::Array(
                items
                    .into_iter()
                    .map(|item| descend(item, segment))
                    .filter(|v| !v.is_null())
                    .collect(),
            ),
        },
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::descriptor::fixtures::DESCRIPTOR;
    use serde_json::json;

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct WidgetResponse {
        widget: Option<Value>,
        failures: Vec<String>,
    }

    crate::projection! {
        enum WidgetField for WidgetResponse {
            Widget => widget,
            Failures => failures,
        }
    }

    fn response() -> WidgetResponse {
        WidgetResponse {
            widget: Some(json!({
                "serviceName": "svc1",
                "deployments": [{"id": "d-1"}, {"id": "d-2"}]
            })),
            failures: vec![],
        }
    }

    fn context() -> Context {
        let mut b = ContextBuilder::new(&DESCRIPTOR);
        b.bind_text("ServiceName", "svc1").unwrap();
        b.finish()
    }

    fn resolve(text: &str) -> Result<Selector<WidgetField>, BindError> {
        Selector::resolve(text, &DESCRIPTOR)
    }

    #[test]
    fn star_returns_whole_response() {
        let out = resolve("*").unwrap().apply(&response(), &context());
        assert_eq!(out["widget"]["serviceName"], "svc1");
        assert_eq!(out["failures"], json!([]));
    }

    #[test]
    fn field_is_case_insensitive() {
        let sel = resolve("widget").unwrap();
        assert!(matches!(sel, Selector::Field { field: WidgetField::Widget, .. }));
        let out = sel.apply(&response(), &context());
        assert_eq!(out["serviceName"], "svc1");
    }

    #[test]
    fn field_path_navigates_and_maps_over_arrays() {
        let ctx = context();
        let name = resolve("Widget.ServiceName").unwrap().apply(&response(), &ctx);
        assert_eq!(name, json!("svc1"));
        let ids = resolve("Widget.Deployments.Id").unwrap().apply(&response(), &ctx);
        assert_eq!(ids, json!(["d-1", "d-2"]));
        let second = resolve("Widget.Deployments.1.Id").unwrap().apply(&response(), &ctx);
        assert_eq!(second, json!("d-2"));
        let missing = resolve("Widget.Nope").unwrap().apply(&response(), &ctx);
        assert_eq!(missing, Value::Null);
    }

    #[test]
    fn echo_returns_bound_input() {
        let sel = resolve("^servicename").unwrap();
        assert_eq!(sel, Selector::Echo("ServiceName"));
        assert_eq!(sel.apply(&response(), &context()), json!("svc1"));
        let unbound = resolve("^Cluster").unwrap().apply(&response(), &context());
        assert_eq!(unbound, Value::Null);
    }

    #[test]
    fn invalid_selectors_fail_at_resolution() {
        for bad in ["Service", "^Colour", "", "Widget..Id", "^"] {
            let err = resolve(bad).unwrap_err();
            assert!(matches!(err, BindError::InvalidSelector { .. }), "{bad}");
        }
        let msg = resolve("Nope").unwrap_err().to_string();
        assert!(msg.contains("Widget, Failures"));
    }
}
