//! Pipeline binding: feed piped stdin into a command's pipeline parameter.

use anyhow::Context as _;
use ecsctl_binding::{CommandDescriptor, ContextBuilder};
use std::io::{BufRead, IsTerminal};

/// Bind the pipeline parameter from `input` unless the command line already
/// did. Collection parameters take every non-empty line; scalars take the
/// first. Returns whether anything was bound.
pub fn bind_piped(
    descriptor: &'static CommandDescriptor,
    builder: &mut ContextBuilder,
    input: impl BufRead,
) -> anyhow::Result<bool> {
    let Some(spec) = descriptor.pipeline_param() else {
        return Ok(false);
    };
    if builder.is_bound(spec.name) {
        return Ok(false);
    }

    let mut bound = false;
    for line in input.lines() {
        let line = line.context("failed to read piped input")?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        builder.bind_text(spec.name, value)?;
        bound = true;
        if !spec.ty.is_collection() {
            break;
        }
    }
    if bound {
        tracing::debug!(command = descriptor.name, param = spec.name, "bound from stdin");
    }
    Ok(bound)
}

/// [`bind_piped`] from the process's stdin, when stdin is not a terminal.
pub fn bind_from_stdin(
    descriptor: &'static CommandDescriptor,
    builder: &mut ContextBuilder,
) -> anyhow::Result<bool> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(false);
    }
    bind_piped(descriptor, builder, stdin.lock())
}
