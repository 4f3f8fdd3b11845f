//! # ecsctl-binding: schema-driven command binding
//!
//! Every command exposed by `ecsctl` is one remote operation with a flat,
//! typed parameter surface. This crate holds the generic engine that turns
//! bound parameters into a request, sends it, and projects the response.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  CommandDescriptor / ParamSpec  (descriptor.rs)  │
//! │  └── name, operation, params, aliases, confirm   │
//! ├──────────────────────────────────────────────────┤
//! │  ContextBuilder → Context  (context.rs)          │
//! │  └── alias resolution, typed parsing, warnings   │
//! ├──────────────────────────────────────────────────┤
//! │  NestedBuilder  (assemble.rs)                    │
//! │  └── empty nested objects collapse to None       │
//! ├──────────────────────────────────────────────────┤
//! │  invoke  (invoke.rs)                             │
//! │  └── Transport + StopSignal, DNS error wrapping  │
//! ├──────────────────────────────────────────────────┤
//! │  Selector  (select.rs)                           │
//! │  └── `*` · `Field[.path]` · `^Param`             │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! [`pipeline::execute`] strings the stages together:
//! Bind → Confirm → Assemble → Invoke → Project.

pub mod param;
pub mod descriptor;
pub mod error;
pub mod context;
pub mod assemble;
pub mod select;
pub mod confirm;
pub mod cancel;
pub mod invoke;
pub mod pipeline;

pub use assemble::{nested, NestedBuilder};
pub use cancel::StopSignal;
pub use confirm::{AssumeYes, ConfirmPrompt, Confirmer};
pub use context::{Context, ContextBuilder};
pub use descriptor::{CommandDescriptor, ConfirmSpec};
pub use error::{BindError, BoxError, CommandError, InvokeError, TransportError};
pub use invoke::{invoke, Transport};
pub use param::{ParamSpec, ParamType};
pub use pipeline::{execute, Binding, Cmdlet, InvokeOptions, Operation, Outcome, Session};
pub use select::{Projection, Selector};

// Used by the `projection!` macro expansion.
#[doc(hidden)]
pub use serde_json;
