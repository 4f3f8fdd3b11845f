//! Interactive confirmation on the terminal.

use ecsctl_binding::{ConfirmPrompt, Confirmer, StopSignal};
use std::io::{BufRead, IsTerminal, Write};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Asks on stderr and reads the answer from stdin. Without a terminal to ask
/// on, it declines; pass `--force` for unattended runs. A stop while the
/// question is pending declines at once.
#[derive(Debug, Clone)]
pub struct TerminalConfirmer {
    stop: StopSignal,
}

impl TerminalConfirmer {
    pub fn new(stop: StopSignal) -> Self {
        Self { stop }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        if !std::io::stdin().is_terminal() {
            tracing::warn!(
                action = %prompt.action,
                "no terminal to confirm on; declining (use --force to skip confirmation)"
            );
            return false;
        }
        let prompt = prompt.clone();
        answer_or_stop(&self.stop, move || {
            ask(&prompt, &mut std::io::stdin().lock(), &mut std::io::stderr())
        })
    }
}

/// Wait for `read` unless `stop` fires first, in which case the answer is
/// no. The reader runs on a detached thread and is abandoned on stop.
fn answer_or_stop(stop: &StopSignal, read: impl FnOnce() -> bool + Send + 'static) -> bool {
    let handle = match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => handle,
        _ => return read(),
    };

    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let _ = tx.send(read());
    });
    tokio::task::block_in_place(|| {
        handle.block_on(async {
            tokio::select! {
                biased;
                _ = stop.stopped() => {
                    eprintln!();
                    false
                }
                answer = rx => answer.unwrap_or(false),
            }
        })
    })
}

/// Show `prompt` on `output` and read a yes/no answer from `input`.
/// Anything other than `y`/`yes` declines.
pub fn ask(prompt: &ConfirmPrompt, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    let shown = write!(
        output,
        "Are you sure you want to perform this action?\n{prompt}\n[Y] Yes  [N] No (default is \"N\"): "
    )
    .and_then(|()| output.flush());
    if shown.is_err() {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
