//! Confirmation gate for mutating commands.

use crate::context::Context;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub action: String,
    pub target: String,
}

impl fmt::Display for ConfirmPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Performing the operation \"{}\" on target \"{}\".",
            self.action, self.target
        )
    }
}

/// Decides whether a gated command may proceed.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Accepts everything. Used for `--force` and non-interactive callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}

/// Build the prompt for a gated command, echoing the bound target values.
/// Returns `None` for commands without a gate.
pub fn prompt_for(context: &Context) -> Option<ConfirmPrompt> {
    let descriptor = context.descriptor();
    let spec = descriptor.confirm?;
    let target = spec
        .targets
        .iter()
        .filter_map(|name| context.value(name))
        .map(display_value)
        .collect::<Vec<_>>()
        .join(", ");
    Some(ConfirmPrompt {
        action: descriptor.action_label(),
        target,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
