use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::contrib::discovery::DiscoveryMode;
use crate::contrib::window::DateWindow;
use crate::github::PUBLIC_API_URL;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".contrib-report.toml";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("GitHub username not provided (use --username or GITHUB_USERNAME)")]
    MissingUsername,

    #[error("GitHub token not provided (use --token or GITHUB_TOKEN)")]
    MissingToken,

    #[error("Enterprise mode requires an enterprise URL (use --enterprise-url or GITHUB_ENTERPRISE_URL)")]
    MissingEnterpriseUrl,

    #[error("Invalid {field} date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid value {value:?} for {field}: expected true or false")]
    InvalidFlag { field: &'static str, value: String },

    #[error("Start date {start} is after end date {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}

/// Contents of `.contrib-report.toml`. Every field is optional; the tool runs
/// with no file at all as long as username and token come from elsewhere.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    pub username: Option<String>,
    pub token: Option<String>,
    pub enterprise_url: Option<String>,
    pub enterprise: Option<bool>,
    pub verify_tls: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Inclusive start date, `YYYY-MM-DD`
    pub since: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`
    pub until: Option<String>,
    pub mode: Option<DiscoveryMode>,
}

/// Values given on the command line; these win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub token: Option<String>,
    pub enterprise_url: Option<String>,
    pub enterprise: bool,
    pub since: Option<String>,
    pub until: Option<String>,
    pub no_verify_tls: bool,
    pub mode: Option<DiscoveryMode>,
}

/// Who to report on and how to reach the API. Fixed for the whole run.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub token: String,
    /// API root: `https://api.github.com` or `{enterprise}/api/v3`
    pub base_url: String,
    pub is_enterprise: bool,
    pub verify_tls: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("is_enterprise", &self.is_enterprise)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// Fully resolved run configuration handed to the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub window: DateWindow,
    pub mode: DiscoveryMode,
}

impl Config {
    /// Load `path` if given, otherwise `.contrib-report.toml` from the current
    /// directory. A missing default file yields the default config; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge command-line overrides, environment and file values into
    /// [`Settings`]. Precedence per field: CLI, then environment, then file.
    ///
    /// `env` looks up an environment variable by name; `main` passes
    /// `std::env::var`, tests pass a map.
    pub fn resolve<F>(&self, overrides: &Overrides, env: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |cli: &Option<String>, var: &str, file: &Option<String>| {
            cli.clone()
                .or_else(|| env(var))
                .or_else(|| file.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let username = pick(&overrides.username, "GITHUB_USERNAME", &self.github.username)
            .ok_or(ConfigError::MissingUsername)?;
        let token = pick(&overrides.token, "GITHUB_TOKEN", &self.github.token)
            .ok_or(ConfigError::MissingToken)?;

        let is_enterprise = if overrides.enterprise {
            true
        } else {
            match env("GITHUB_IS_ENTERPRISE") {
                Some(value) => parse_flag("GITHUB_IS_ENTERPRISE", &value)?,
                None => self.github.enterprise.unwrap_or(false),
            }
        };

        let base_url = if is_enterprise {
            let host = pick(
                &overrides.enterprise_url,
                "GITHUB_ENTERPRISE_URL",
                &self.github.enterprise_url,
            )
            .ok_or(ConfigError::MissingEnterpriseUrl)?;
            format!("{}/api/v3", host.trim_end_matches('/'))
        } else {
            PUBLIC_API_URL.to_string()
        };

        let verify_tls = if overrides.no_verify_tls {
            false
        } else {
            match env("GITHUB_VERIFY_SSL") {
                Some(value) => parse_flag("GITHUB_VERIFY_SSL", &value)?,
                None => self.github.verify_tls.unwrap_or(true),
            }
        };

        let start = pick(&overrides.since, "GITHUB_START_DATE", &self.report.since)
            .map(|v| parse_date("start", &v))
            .transpose()?;
        let end = pick(&overrides.until, "GITHUB_END_DATE", &self.report.until)
            .map(|v| parse_date("end", &v))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ConfigError::InvertedWindow { start, end });
            }
        }

        Ok(Settings {
            credentials: Credentials {
                username,
                token,
                base_url,
                is_enterprise,
                verify_tls,
            },
            window: DateWindow::new(start, end),
            mode: overrides.mode.or(self.report.mode).unwrap_or_default(),
        })
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_flag(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            field,
            value: value.to_string(),
        }),
    }
}
