//! AWS configuration, credential management, and region handling.
//!
//! Settings are resolved once per invocation into an explicit [`SdkConfig`]:
//! command-line values first, then the process environment, then the shared
//! AWS files (`~/.aws/credentials` and `~/.aws/config`). Nothing here is
//! cached or global.

use crate::error::{AwsError, AwsResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// ── Regions ─────────────────────────────────────────────────────────────

/// Regions where ECS is offered.
pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-south-1",
    "eu-south-2",
    "eu-north-1",
    "il-central-1",
    "me-south-1",
    "me-central-1",
    "sa-east-1",
    // GovCloud
    "us-gov-east-1",
    "us-gov-west-1",
    // China
    "cn-north-1",
    "cn-northwest-1",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsRegion {
    /// Region code (e.g., "us-east-1").
    pub name: String,
}

impl AwsRegion {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Regional endpoint for `service`: `https://{service}.{region}.amazonaws.com`,
    /// with the `.com.cn` suffix in the China partition.
    pub fn endpoint(&self, service: &str) -> String {
        match self.partition() {
            "aws-cn" => format!("https://{}.{}.amazonaws.com.cn", service, self.name),
            _ => format!("https://{}.{}.amazonaws.com", service, self.name),
        }
    }

    pub fn is_known(&self) -> bool {
        AWS_REGIONS.contains(&self.name.as_str())
    }

    /// Return the partition for this region (aws, aws-cn, aws-us-gov).
    pub fn partition(&self) -> &'static str {
        if self.name.starts_with("cn-") {
            "aws-cn"
        } else if self.name.starts_with("us-gov-") {
            "aws-us-gov"
        } else {
            "aws"
        }
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ── Credentials ─────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Deserialize)]
pub struct AwsCredentials {
    /// Access key ID (AKIA* for long-term keys, ASIA* for temporary ones).
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Present for temporary credentials issued by STS.
    pub session_token: Option<String>,
    pub expiration: Option<DateTime<Utc>>,
    /// Where these credentials came from, for diagnostics.
    pub provider_name: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .field("expiration", &self.expiration)
            .field("provider_name", &self.provider_name)
            .finish()
    }
}

impl AwsCredentials {
    pub fn new(
        access_key_id: &str,
        secret_access_key: &str,
        session_token: Option<&str>,
        provider_name: &str,
    ) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: session_token.map(str::to_string),
            expiration: None,
            provider_name: provider_name.to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expiration.is_some_and(|exp| Utc::now() > exp)
    }

    /// Resolve credentials from `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`.
    fn from_environment(env: &dyn Fn(&str) -> Option<String>) -> Option<Self> {
        let access_key = env("AWS_ACCESS_KEY_ID")?;
        let secret_key = env("AWS_SECRET_ACCESS_KEY")?;
        let session_token = env("AWS_SESSION_TOKEN");
        Some(Self::new(
            &access_key,
            &secret_key,
            session_token.as_deref(),
            "environment",
        ))
    }
}

// ── Named Profile ───────────────────────────────────────────────────────

/// One named profile, merged from `~/.aws/credentials` and `~/.aws/config`.
#[derive(Debug, Clone, Default)]
pub struct AwsProfile {
    pub name: String,
    pub region: Option<String>,
    pub credentials: Option<AwsCredentials>,
    pub endpoint_url: Option<String>,
}

impl AwsProfile {
    /// Load `name` from the shared files. Missing files are treated as empty.
    /// Returns `None` when neither file has a section for the profile.
    pub fn load(name: &str, credentials_file: &Path, config_file: &Path) -> AwsResult<Option<Self>> {
        let credentials = read_ini(credentials_file)?;
        let config = read_ini(config_file)?;

        // The config file names non-default profiles "[profile NAME]".
        let config_section = if name == DEFAULT_PROFILE {
            config.get(DEFAULT_PROFILE)
        } else {
            config
                .get(&format!("profile {name}"))
                .or_else(|| config.get(name))
        };
        let credentials_section = credentials.get(name);
        if config_section.is_none() && credentials_section.is_none() {
            return Ok(None);
        }

        let lookup = |key: &str| {
            credentials_section
                .and_then(|s| s.get(key))
                .or_else(|| config_section.and_then(|s| s.get(key)))
                .cloned()
        };
        let credentials = match (lookup("aws_access_key_id"), lookup("aws_secret_access_key")) {
            (Some(id), Some(secret)) => Some(AwsCredentials::new(
                &id,
                &secret,
                lookup("aws_session_token").as_deref(),
                &format!("profile:{name}"),
            )),
            _ => None,
        };

        Ok(Some(Self {
            name: name.to_string(),
            region: config_section.and_then(|s| s.get("region")).cloned(),
            credentials,
            endpoint_url: config_section.and_then(|s| s.get("endpoint_url")).cloned(),
        }))
    }
}

type IniSections = BTreeMap<String, BTreeMap<String, String>>;

fn read_ini(path: &Path) -> AwsResult<IniSections> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_ini(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(IniSections::new()),
        Err(e) => Err(AwsError::credential_error(&format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Minimal INI reader for the AWS shared files: `[section]` headers and
/// `key = value` lines; `#` and `;` start comments.
fn parse_ini(text: &str) -> IniSections {
    let mut sections = IniSections::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = header.split_whitespace().collect::<Vec<_>>().join(" ");
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        let (Some(section), Some((key, value))) = (current.as_ref(), line.split_once('=')) else {
            continue;
        };
        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }
    sections
}

// ── Client settings ─────────────────────────────────────────────────────

/// Connection values given explicitly on the command line. Every field is
/// optional; unset fields fall back to the environment and shared files.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ── SDK Config ──────────────────────────────────────────────────────────

/// Fully resolved client configuration. Mirrors `aws_config::SdkConfig`.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub region: AwsRegion,
    pub credentials: AwsCredentials,
    pub endpoint_url: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Product token sent as the User-Agent.
    pub app_name: String,
}

impl SdkConfig {
    pub fn new(region: AwsRegion, credentials: AwsCredentials) -> Self {
        Self {
            region,
            credentials,
            endpoint_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            app_name: concat!("ecsctl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Resolve against the real process environment and home directory.
    pub fn resolve(settings: &ClientSettings) -> AwsResult<Self> {
        Self::resolve_with(settings, &|key| {
            std::env::var(key).ok().filter(|v| !v.is_empty())
        })
    }

    /// Resolve `settings`, reading fallbacks through `env`.
    pub fn resolve_with(
        settings: &ClientSettings,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> AwsResult<Self> {
        let explicit_profile = settings.profile.clone().or_else(|| env("AWS_PROFILE"));
        let profile_name = explicit_profile.as_deref().unwrap_or(DEFAULT_PROFILE);
        let (credentials_file, config_file) = shared_file_paths(env);
        let profile = AwsProfile::load(profile_name, &credentials_file, &config_file)?;
        if profile.is_none() && explicit_profile.is_some() {
            return Err(AwsError::credential_error(&format!(
                "profile '{profile_name}' was not found in {} or {}",
                credentials_file.display(),
                config_file.display()
            )));
        }
        let profile = profile.unwrap_or_default();

        let credentials = Self::resolve_credentials(settings, env, &profile)?;
        if credentials.is_expired() {
            return Err(AwsError::credential_error(&format!(
                "credentials from {} have expired",
                credentials.provider_name
            )));
        }

        let region = settings
            .region
            .clone()
            .or_else(|| env("AWS_REGION"))
            .or_else(|| env("AWS_DEFAULT_REGION"))
            .or_else(|| profile.region.clone())
            .ok_or_else(|| {
                AwsError::validation(
                    "ecs",
                    "No region specified or obtained from persisted/shell defaults. \
                     Pass --region, set AWS_REGION, or add a region to the profile.",
                )
            })?;
        let region = AwsRegion::new(&region);
        if !region.is_known() {
            log::warn!("Region '{}' is not a known ECS region; sending anyway", region);
        }

        let endpoint_url = settings
            .endpoint_url
            .clone()
            .or_else(|| env("AWS_ENDPOINT_URL_ECS"))
            .or_else(|| env("AWS_ENDPOINT_URL"))
            .or_else(|| profile.endpoint_url.clone());

        let mut config = Self::new(region, credentials);
        config.endpoint_url = endpoint_url;
        if let Some(secs) = settings.timeout_secs {
            config.request_timeout_secs = secs;
        }
        log::debug!(
            "Resolved AWS settings: region={} credentials={} endpoint={:?}",
            config.region,
            config.credentials.provider_name,
            config.endpoint_url
        );
        Ok(config)
    }

    /// Static keys on the command line win, then a profile named on the
    /// command line, then environment keys, then the ambient profile.
    fn resolve_credentials(
        settings: &ClientSettings,
        env: &dyn Fn(&str) -> Option<String>,
        profile: &AwsProfile,
    ) -> AwsResult<AwsCredentials> {
        match (&settings.access_key, &settings.secret_key) {
            (Some(id), Some(secret)) => {
                return Ok(AwsCredentials::new(
                    id,
                    secret,
                    settings.session_token.as_deref(),
                    "command-line",
                ))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(AwsError::validation(
                    "ecs",
                    "--access-key and --secret-key must be given together",
                ))
            }
            (None, None) => {}
        }
        if settings.profile.is_some() {
            if let Some(creds) = &profile.credentials {
                return Ok(creds.clone());
            }
        }
        if let Some(creds) = AwsCredentials::from_environment(env) {
            return Ok(creds);
        }
        profile.credentials.clone().ok_or_else(|| {
            AwsError::credential_error(&format!(
                "No credentials specified or obtained from persisted/shell defaults (profile '{}').",
                if profile.name.is_empty() { DEFAULT_PROFILE } else { &profile.name }
            ))
        })
    }
}

fn shared_file_paths(env: &dyn Fn(&str) -> Option<String>) -> (PathBuf, PathBuf) {
    let aws_dir = dirs::home_dir().unwrap_or_default().join(".aws");
    let credentials = env("AWS_SHARED_CREDENTIALS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| aws_dir.join("credentials"));
    let config = env("AWS_CONFIG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| aws_dir.join("config"));
    (credentials, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const CREDENTIALS: &str = "\
[default]
aws_access_key_id = AKIADEFAULT
aws_secret_access_key = default-secret

[prod]
aws_access_key_id=AKIAPROD
aws_secret_access_key=prod-secret
aws_session_token = prod-token
";

    const CONFIG: &str = "\
# shared config
[default]
region = us-west-2

[profile prod]
region = eu-west-1
endpoint_url = http://localhost:4566

[profile regiononly]
region = ap-south-1
";

    struct Files {
        _dir: tempfile::TempDir,
        credentials: PathBuf,
        config: PathBuf,
    }

    fn shared_files() -> Files {
        let dir = tempfile::tempdir().unwrap();
        let credentials = dir.path().join("credentials");
        let config = dir.path().join("config");
        std::fs::File::create(&credentials)
            .unwrap()
            .write_all(CREDENTIALS.as_bytes())
            .unwrap();
        std::fs::write(&config, CONFIG).unwrap();
        Files {
            _dir: dir,
            credentials,
            config,
        }
    }

    fn env_of(files: &Files, extra: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut vars: HashMap<String, String> = extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.insert(
            "AWS_SHARED_CREDENTIALS_FILE".into(),
            files.credentials.display().to_string(),
        );
        vars.insert("AWS_CONFIG_FILE".into(), files.config.display().to_string());
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn region_endpoints() {
        assert_eq!(
            AwsRegion::new("us-east-1").endpoint("ecs"),
            "https://ecs.us-east-1.amazonaws.com"
        );
        assert_eq!(
            AwsRegion::new("cn-north-1").endpoint("ecs"),
            "https://ecs.cn-north-1.amazonaws.com.cn"
        );
        assert_eq!(AwsRegion::new("us-gov-west-1").partition(), "aws-us-gov");
        assert!(!AwsRegion::new("mars-central-1").is_known());
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = AwsCredentials::new("AKIAEXAMPLE", "hunter2", Some("tok"), "static");
        let shown = format!("{creds:?}");
        assert!(shown.contains("AKIAEXAMPLE"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("tok\""));
    }

    #[test]
    fn ini_sections_and_comments() {
        let parsed = parse_ini("; note\n[profile  a]\nx = 1\n\n[b]\n y=2 \norphan\n");
        assert_eq!(parsed["profile a"]["x"], "1");
        assert_eq!(parsed["b"]["y"], "2");
    }

    #[test]
    fn profile_merges_both_files() {
        let files = shared_files();
        let prod = AwsProfile::load("prod", &files.credentials, &files.config)
            .unwrap()
            .unwrap();
        assert_eq!(prod.region.as_deref(), Some("eu-west-1"));
        assert_eq!(prod.endpoint_url.as_deref(), Some("http://localhost:4566"));
        let creds = prod.credentials.unwrap();
        assert_eq!(creds.access_key_id, "AKIAPROD");
        assert!(creds.session_token.is_some());
        assert!(AwsProfile::load("missing", &files.credentials, &files.config)
            .unwrap()
            .is_none());
    }

    #[test]
    fn missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let none = AwsProfile::load(
            "default",
            &dir.path().join("nope"),
            &dir.path().join("nope2"),
        )
        .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn command_line_beats_environment() {
        let files = shared_files();
        let env = env_of(
            &files,
            &[
                ("AWS_ACCESS_KEY_ID", "AKIAENV"),
                ("AWS_SECRET_ACCESS_KEY", "env-secret"),
                ("AWS_REGION", "eu-north-1"),
            ],
        );
        let settings = ClientSettings {
            region: Some("us-east-1".into()),
            access_key: Some("AKIACLI".into()),
            secret_key: Some("cli-secret".into()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let config = SdkConfig::resolve_with(&settings, &env).unwrap();
        assert_eq!(config.region.name, "us-east-1");
        assert_eq!(config.credentials.access_key_id, "AKIACLI");
        assert_eq!(config.request_timeout_secs, 5);
        assert!(config.app_name.starts_with("ecsctl/"));
    }

    #[test]
    fn environment_beats_default_profile() {
        let files = shared_files();
        let env = env_of(
            &files,
            &[
                ("AWS_ACCESS_KEY_ID", "AKIAENV"),
                ("AWS_SECRET_ACCESS_KEY", "env-secret"),
            ],
        );
        let config = SdkConfig::resolve_with(&ClientSettings::default(), &env).unwrap();
        assert_eq!(config.credentials.access_key_id, "AKIAENV");
        assert_eq!(config.credentials.provider_name, "environment");
        // Region still comes from the default profile.
        assert_eq!(config.region.name, "us-west-2");
    }

    #[test]
    fn named_profile_beats_environment_keys() {
        let files = shared_files();
        let env = env_of(
            &files,
            &[
                ("AWS_ACCESS_KEY_ID", "AKIAENV"),
                ("AWS_SECRET_ACCESS_KEY", "env-secret"),
            ],
        );
        let settings = ClientSettings {
            profile: Some("prod".into()),
            ..Default::default()
        };
        let config = SdkConfig::resolve_with(&settings, &env).unwrap();
        assert_eq!(config.credentials.access_key_id, "AKIAPROD");
        assert_eq!(config.region.name, "eu-west-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn ecs_endpoint_variable_wins_over_generic() {
        let files = shared_files();
        let env = env_of(
            &files,
            &[
                ("AWS_ENDPOINT_URL", "http://generic"),
                ("AWS_ENDPOINT_URL_ECS", "http://ecs-only"),
            ],
        );
        let config = SdkConfig::resolve_with(&ClientSettings::default(), &env).unwrap();
        assert_eq!(config.endpoint_url.as_deref(), Some("http://ecs-only"));
    }

    #[test]
    fn half_a_key_pair_is_rejected() {
        let files = shared_files();
        let settings = ClientSettings {
            access_key: Some("AKIACLI".into()),
            ..Default::default()
        };
        let err = SdkConfig::resolve_with(&settings, &env_of(&files, &[])).unwrap_err();
        assert_eq!(err.code, "ValidationError");
    }

    #[test]
    fn unknown_named_profile_is_an_error() {
        let files = shared_files();
        let env = env_of(&files, &[("AWS_PROFILE", "ghost")]);
        let err = SdkConfig::resolve_with(&ClientSettings::default(), &env).unwrap_err();
        assert!(err.message.contains("ghost"));
    }

    #[test]
    fn profile_without_keys_has_no_credentials() {
        let files = shared_files();
        let settings = ClientSettings {
            profile: Some("regiononly".into()),
            ..Default::default()
        };
        // Falls through to the environment, which is empty here.
        let err = SdkConfig::resolve_with(&settings, &env_of(&files, &[])).unwrap_err();
        assert_eq!(err.code, "CredentialError");
    }

    #[test]
    fn missing_region_fails_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let creds = dir.path().join("credentials");
        std::fs::write(&creds, "[default]\naws_access_key_id=A\naws_secret_access_key=B\n").unwrap();
        let vars = HashMap::from([
            ("AWS_SHARED_CREDENTIALS_FILE".to_string(), creds.display().to_string()),
            (
                "AWS_CONFIG_FILE".to_string(),
                dir.path().join("config").display().to_string(),
            ),
        ]);
        let env = move |key: &str| vars.get(key).cloned();
        let err = SdkConfig::resolve_with(&ClientSettings::default(), &env).unwrap_err();
        assert_eq!(err.code, "ValidationError");
        assert!(err.message.contains("No region"));
    }

    #[test]
    #[serial_test::serial]
    fn resolve_reads_process_environment() {
        let files = shared_files();
        std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", &files.credentials);
        std::env::set_var("AWS_CONFIG_FILE", &files.config);
        std::env::set_var("AWS_PROFILE", "prod");
        let result = SdkConfig::resolve(&ClientSettings::default());
        std::env::remove_var("AWS_SHARED_CREDENTIALS_FILE");
        std::env::remove_var("AWS_CONFIG_FILE");
        std::env::remove_var("AWS_PROFILE");

        // Ambient AWS_* variables on the test host may override the profile's
        // region, but the profile's endpoint is always reachable.
        let config = result.unwrap();
        assert!(config.endpoint_url.is_some());
    }
}
