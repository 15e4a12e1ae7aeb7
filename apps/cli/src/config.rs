use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

const DEFAULT_ROLE: &str = "Software Engineer";
const DEFAULT_MAX_FILES: usize = 2000;
const DEFAULT_HOT_FILE_TOP_N: usize = 50;
const DEFAULT_STYLE: &str = "senior_technical_lead";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required config section: {0}")]
    MissingSection(&'static str),

    #[error("{0}")]
    Invalid(String),
}

/// Application configuration: the YAML file plus secrets from the environment.
/// Validated once at startup and passed by reference afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub you: PersonConfig,
    pub git: GitConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub env: EnvSettings,
}

#[derive(Debug, Clone)]
pub struct PersonConfig {
    pub full_name: String,
    pub role: String,
    pub aliases: Vec<String>,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitConfig {
    #[serde(default, deserialize_with = "deserialize_since")]
    pub since: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_until")]
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub include_merge_commits: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_hot_file_top_n")]
    pub hot_file_top_n: usize,
    #[serde(default)]
    pub languages_of_interest: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub bullets_count: usize,
    pub style: String,
}

/// Secrets and repository coordinates taken from the environment (or `.env`).
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    pub anthropic_api_key: Option<String>,
    pub github_token: Option<String>,
    pub github_owner: Option<String>,
    pub github_repo: Option<String>,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            github_token: optional_env("GITHUB_TOKEN"),
            github_owner: optional_env("GITHUB_OWNER"),
            github_repo: optional_env("GITHUB_REPO"),
        }
    }
}

// Mirrors the YAML file; every section is optional here so that a missing
// one is reported by name instead of as a serde error.
#[derive(Debug, Deserialize)]
struct RawConfig {
    you: Option<RawPerson>,
    git: Option<GitConfig>,
    analysis: Option<AnalysisConfig>,
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawPerson {
    full_name: Option<String>,
    role: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    emails: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    bullets_count: Option<i64>,
    style: Option<String>,
}

impl Config {
    /// Reads and validates the YAML file at `path`, then picks up secrets
    /// from the environment. `.env` must already be loaded.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&contents)?;
        config.env = EnvSettings::from_env();
        Ok(config)
    }

    /// Parses and validates YAML without consulting the environment.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(contents)?;

        let you = raw.you.ok_or(ConfigError::MissingSection("you"))?;
        let git = raw.git.ok_or(ConfigError::MissingSection("git"))?;
        let analysis = raw.analysis.ok_or(ConfigError::MissingSection("analysis"))?;
        let output = raw.output.ok_or(ConfigError::MissingSection("output"))?;

        let full_name = you
            .full_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ConfigError::Invalid("'you.full_name' is required".to_string()))?;
        let emails = you.emails.filter(|e| !e.is_empty()).ok_or_else(|| {
            ConfigError::Invalid("'you.emails' must be a non-empty list".to_string())
        })?;
        let bullets_count = output
            .bullets_count
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ConfigError::Invalid("'output.bullets_count' must be a positive integer".to_string())
            })? as usize;

        Ok(Config {
            you: PersonConfig {
                full_name,
                role: you.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
                aliases: you.aliases,
                emails,
            },
            git,
            analysis,
            output: OutputConfig {
                bullets_count,
                style: output.style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            },
            env: EnvSettings::default(),
        })
    }
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

fn default_hot_file_top_n() -> usize {
    DEFAULT_HOT_FILE_TOP_N
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn deserialize_since<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    raw.map(|r| parse_date_bound(&r, false).map_err(serde::de::Error::custom))
        .transpose()
}

fn deserialize_until<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    raw.map(|r| parse_date_bound(&r, true).map_err(serde::de::Error::custom))
        .transpose()
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD`, which covers the whole day:
/// midnight as a lower bound, the last second as an upper bound.
fn parse_date_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let invalid = || format!("invalid date '{raw}': expected YYYY-MM-DD or RFC 3339");
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let naive = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
    .ok_or_else(invalid)?;
    Ok(Utc.from_utc_datetime(&naive))
}
