//! Command descriptors: the static description of one command.

use crate::param::ParamSpec;

/// Confirmation gate for mutating commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmSpec {
    /// Parameters whose bound values identify the resource in the prompt.
    pub targets: &'static [&'static str],
}

/// Static description of a command.
#[derive(Debug)]
pub struct CommandDescriptor {
    /// Command-line name, e.g. `new-service`.
    pub name: &'static str,
    /// Historical cmdlet name, e.g. `New-ECSService`.
    pub legacy_name: &'static str,
    /// Remote API action, e.g. `CreateService`.
    pub operation: &'static str,
    pub about: &'static str,
    pub params: &'static [ParamSpec],
    /// Selector used when the caller passes none.
    pub default_select: &'static str,
    pub confirm: Option<ConfirmSpec>,
}

impl CommandDescriptor {
    /// Look a parameter up by name or alias.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.matches(name))
    }

    /// The parameter that binds from piped input, if any.
    pub fn pipeline_param(&self) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.pipeline)
    }

    /// Label used in confirmation prompts and logs.
    pub fn action_label(&self) -> String {
        format!("{} ({})", self.name, self.operation)
    }

    /// True if `name` (case-insensitive) is this command's name or legacy name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.legacy_name.eq_ignore_ascii_case(name)
    }
}
