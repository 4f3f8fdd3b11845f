//! # ecsctl
//!
//! Binary support: the clap surface generated from the ECS command catalog,
//! logging setup, terminal confirmation, stdin pipeline binding and the
//! invocation driver behind `main`.

pub mod cli;
pub mod logging;
pub mod prompt;
pub mod stdin;

use anyhow::Context as _;
use clap::ArgMatches;
use ecsctl_aws::{EcsTransport, SdkConfig};
use ecsctl_binding::{Cmdlet, CommandError, Outcome, Session, StopSignal};
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

/// Exit status after Ctrl-C, as shells report SIGINT.
pub const EXIT_CANCELLED: u8 = 130;

/// Parse `args`, run the selected command and map the result to an exit
/// status: 0 on success or a declined confirmation, 1 on error, 130 when
/// cancelled.
pub async fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match cli::command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let Some((name, sub)) = matches.subcommand() else {
        return ExitCode::FAILURE;
    };

    let global = cli::GlobalArgs::from_matches(sub);
    if let Err(err) = logging::init(&global.log) {
        eprintln!("warning: {err:#}");
    }

    let outcome = match ecsctl_ecs::find(name) {
        Some(cmd) => dispatch(cmd, sub, &global).await,
        None => Err(anyhow::anyhow!("unknown command '{name}'")),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_cancelled(&err) => {
            eprintln!("ecsctl: {err}");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(
    cmd: &'static dyn Cmdlet,
    matches: &ArgMatches,
    global: &cli::GlobalArgs,
) -> anyhow::Result<()> {
    let descriptor = cmd.descriptor();
    let mut bindings = cli::bind(descriptor, matches)?;
    stdin::bind_from_stdin(descriptor, &mut bindings)?;

    let config = SdkConfig::resolve(&global.settings).context("failed to resolve AWS settings")?;
    let transport = EcsTransport::new(&config)?;
    tracing::debug!(
        command = descriptor.name,
        region = %config.region,
        "resolved client configuration"
    );

    let stop = StopSignal::new();
    let ctrl_c = {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.stop();
            }
        })
    };

    let confirmer = prompt::TerminalConfirmer::new(stop.clone());
    let session = Session {
        transport: &transport,
        confirmer: &confirmer,
        stop: &stop,
    };
    let result = cmd.run(bindings, &global.options, session).await;
    ctrl_c.abort();

    match result? {
        Outcome::Output(value) => print_value(&value),
        Outcome::Declined => {
            tracing::info!(command = descriptor.name, "not confirmed; nothing sent");
            Ok(())
        }
    }
}

/// Pretty JSON on stdout; `null` prints nothing.
fn print_value(value: &serde_json::Value) -> anyhow::Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let text = serde_json::to_string_pretty(value)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}").context("failed to write output")?;
    Ok(())
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CommandError>()
        .is_some_and(CommandError::is_cancelled)
}
