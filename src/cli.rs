//! Command-line surface generated from the command catalog.
//!
//! Every [`CommandDescriptor`] becomes a subcommand; every [`ParamSpec`]
//! becomes a `--kebab-case` flag that also accepts its original PascalCase
//! spelling and aliases. Required parameters are not enforced here: the
//! context only warns and the service decides.

use crate::logging::{LogFormat, LogSettings};
use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ecsctl_aws::ClientSettings;
use ecsctl_binding::{BindError, CommandDescriptor, ContextBuilder, InvokeOptions, ParamSpec, ParamType};
use std::collections::BTreeSet;

// Global flag ids.
const SELECT: &str = "select";
const PASS_THRU: &str = "pass-thru";
const FORCE: &str = "force";
const NO_AUTO_ITERATION: &str = "no-auto-iteration";
const REGION: &str = "region";
const PROFILE: &str = "profile";
const ACCESS_KEY: &str = "access-key";
const SECRET_KEY: &str = "secret-key";
const SESSION_TOKEN: &str = "session-token";
const ENDPOINT_URL: &str = "endpoint-url";
const TIMEOUT_SECS: &str = "timeout-secs";
const LOG_LEVEL: &str = "log-level";
const LOG_FORMAT: &str = "log-format";

/// The full `ecsctl` command tree.
pub fn command() -> Command {
    Command::new("ecsctl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command-line bindings for the Amazon ECS API")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(global_args())
        .subcommands(
            ecsctl_ecs::catalog()
                .iter()
                .map(|cmd| subcommand(cmd.descriptor())),
        )
}

fn global_args() -> Vec<Arg> {
    let switch = |id: &'static str, help: &'static str| {
        Arg::new(id)
            .long(id)
            .global(true)
            .action(ArgAction::SetTrue)
            .help(help)
            .help_heading("Invocation")
    };
    let setting = |id: &'static str, help: &'static str| {
        Arg::new(id)
            .long(id)
            .global(true)
            .action(ArgAction::Set)
            .help(help)
            .help_heading("AWS")
    };

    vec![
        Arg::new(SELECT)
            .long(SELECT)
            .global(true)
            .value_name("SELECTOR")
            .help("'*' for the whole response, a member name (optionally .sub.path), or ^Parameter")
            .help_heading("Invocation"),
        switch(PASS_THRU, "Return the value of the pipeline parameter instead of the response"),
        switch(FORCE, "Skip the confirmation prompt of mutating commands"),
        switch(NO_AUTO_ITERATION, "Fetch only the first page of list commands"),
        setting(REGION, "Region to send requests to, e.g. us-east-1"),
        setting(PROFILE, "Named profile from the shared AWS config files"),
        setting(ACCESS_KEY, "Access key id; requires --secret-key"),
        setting(SECRET_KEY, "Secret access key; requires --access-key"),
        setting(SESSION_TOKEN, "Session token for temporary credentials"),
        setting(ENDPOINT_URL, "Override the service endpoint"),
        setting(TIMEOUT_SECS, "Request timeout in seconds").value_parser(value_parser!(u64)),
        Arg::new(LOG_LEVEL)
            .long(LOG_LEVEL)
            .global(true)
            .value_name("FILTER")
            .help("Log filter, e.g. debug or ecsctl_aws=trace (default: $ECSCTL_LOG or warn)")
            .help_heading("Logging"),
        Arg::new(LOG_FORMAT)
            .long(LOG_FORMAT)
            .global(true)
            .value_parser(PossibleValuesParser::new(["text", "json"]))
            .default_value("text")
            .help("Log line format on stderr")
            .help_heading("Logging"),
    ]
}

/// Subcommand for one descriptor.
pub fn subcommand(descriptor: &'static CommandDescriptor) -> Command {
    let mut cmd = Command::new(descriptor.name)
        .about(descriptor.about)
        .long_about(format!(
            "{}\n\nCalls {}. Default selector: {}",
            descriptor.about, descriptor.operation, descriptor.default_select
        ))
        .alias(descriptor.legacy_name);
    let lowered = descriptor.legacy_name.to_ascii_lowercase();
    if lowered != descriptor.legacy_name {
        cmd = cmd.alias(lowered);
    }
    cmd.args(descriptor.params.iter().map(param_arg))
}

fn param_arg(spec: &'static ParamSpec) -> Arg {
    let long = kebab(spec.name);
    let mut aliases = BTreeSet::new();
    aliases.insert(spec.name.to_string());
    for alias in spec.aliases {
        aliases.insert(kebab(alias));
        aliases.insert(alias.to_string());
    }
    aliases.remove(&long);

    let mut help = spec.help.to_string();
    if let ParamType::Enum(values) = spec.ty {
        if !help.is_empty() {
            help.push_str("; ");
        }
        help.push_str(&format!("one of {}", values.join(", ")));
    }
    if spec.required {
        help.push_str(if help.is_empty() { "[required]" } else { " [required]" });
    }

    let arg = Arg::new(spec.name)
        .long(long)
        .aliases(aliases)
        .value_name(spec.ty.describe().to_ascii_uppercase().replace(' ', "_"))
        .help(help);

    match spec.ty {
        ParamType::Boolean => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        ty if ty.is_collection() => arg.action(ArgAction::Append),
        _ => arg.action(ArgAction::Set),
    }
}

/// `DeploymentConfiguration_MaximumPercent` → `deployment-configuration-maximum-percent`.
///
/// Acronyms stay together: `EnableECSManagedTag` → `enable-ecs-managed-tag`.
pub fn kebab(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            out.push('-');
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary {
                out.push('-');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Copy the parameters given on the command line into a context builder, in
/// command-line order per parameter.
pub fn bind(
    descriptor: &'static CommandDescriptor,
    matches: &ArgMatches,
) -> Result<ContextBuilder, BindError> {
    let mut builder = ContextBuilder::new(descriptor);
    for spec in descriptor.params {
        if let Some(values) = matches.get_many::<String>(spec.name) {
            for raw in values {
                builder.bind_text(spec.name, raw)?;
            }
        }
    }
    Ok(builder)
}

/// Invocation switches, client settings and logging options of one run.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub options: InvokeOptions,
    pub settings: ClientSettings,
    pub log: LogSettings,
}

impl GlobalArgs {
    /// Read the global flags. Pass the subcommand's matches so flags given
    /// after the subcommand name are seen too.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let text = |id: &str| matches.get_one::<String>(id).cloned();
        Self {
            options: InvokeOptions {
                select: text(SELECT),
                pass_thru: matches.get_flag(PASS_THRU),
                force: matches.get_flag(FORCE),
                no_auto_iteration: matches.get_flag(NO_AUTO_ITERATION),
            },
            settings: ClientSettings {
                region: text(REGION),
                profile: text(PROFILE),
                access_key: text(ACCESS_KEY),
                secret_key: text(SECRET_KEY),
                session_token: text(SESSION_TOKEN),
                endpoint_url: text(ENDPOINT_URL),
                timeout_secs: matches.get_one::<u64>(TIMEOUT_SECS).copied(),
            },
            log: LogSettings {
                level: text(LOG_LEVEL),
                format: match text(LOG_FORMAT).as_deref() {
                    Some("json") => LogFormat::Json,
                    _ => LogFormat::Text,
                },
            },
        }
    }
}
