// Configuration loading and parsing (league.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub schedule: ScheduleConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level tables in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub league_id: u64,
    pub season: u16,
    /// IANA timezone name for scheduled posts, e.g. "America/New_York".
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Master switch: when false, `run` posts nothing on a timer.
    pub enabled: bool,
    /// Post the injury/bye monitor before game windows.
    pub monitor: bool,
    /// Post the Wednesday waiver report.
    pub waivers: bool,
    /// Include weekly trophies with the Tuesday recap.
    pub trophies: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            monitor: true,
            waivers: true,
            trophies: true,
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

/// Cookies for private leagues and webhook endpoints for the chat sinks.
/// Everything is optional: a public league with a single webhook works.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub espn_s2: Option<String>,
    pub swid: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub groupme_bot_id: Option<String>,
}

impl CredentialsConfig {
    /// True when at least one chat sink is configured.
    pub fn has_sink(&self) -> bool {
        self.discord_webhook_url.is_some()
            || self.slack_webhook_url.is_some()
            || self.groupme_bot_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and (optionally)
/// `config/credentials.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        league: league_file.league,
        schedule: league_file.schedule,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_id == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.league_id".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.league.season < 2018 {
        return Err(ConfigError::ValidationError {
            field: "league.season".into(),
            message: format!(
                "the v3 fantasy API only serves seasons from 2018 on, got {}",
                config.league.season
            ),
        });
    }

    if config.league.timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(ConfigError::ValidationError {
            field: "league.timezone".into(),
            message: format!(
                "`{}` is not a recognized IANA timezone name",
                config.league.timezone
            ),
        });
    }

    // A private-league cookie pair only works as a pair.
    let creds = &config.credentials;
    if creds.espn_s2.is_some() != creds.swid.is_some() {
        return Err(ConfigError::ValidationError {
            field: "credentials.espn_s2".into(),
            message: "espn_s2 and swid must be provided together".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const VALID_LEAGUE_TOML: &str = r#"
[league]
league_id = 123456
season = 2025
timezone = "America/New_York"

[schedule]
enabled = true
monitor = false
waivers = true
trophies = true
"#;

    /// Helper: returns the path to the project root (works whether
    /// `cargo test` runs from the crate root or elsewhere).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    fn temp_config_dir(name: &str) -> (PathBuf, PathBuf) {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        (tmp, config_dir)
    }

    #[test]
    fn load_valid_config_from_project_files() {
        let root = project_root();
        ensure_config_files(&root).expect("should copy default configs");
        let config = load_config_from(&root).expect("should load valid config");

        assert!(config.league.league_id > 0);
        assert!(config.league.season >= 2018);
        assert!(config.league.timezone.parse::<chrono_tz::Tz>().is_ok());
        assert!(config.schedule.enabled);
    }

    #[test]
    fn missing_credentials_toml_is_ok() {
        let (tmp, config_dir) = temp_config_dir("herald_config_no_creds");
        fs::write(config_dir.join("league.toml"), VALID_LEAGUE_TOML).unwrap();

        let config = load_config_from(&tmp).expect("should load without credentials.toml");
        assert!(config.credentials.espn_s2.is_none());
        assert!(!config.credentials.has_sink());
        assert!(!config.schedule.monitor);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_webhook() {
        let (tmp, config_dir) = temp_config_dir("herald_config_with_creds");
        fs::write(config_dir.join("league.toml"), VALID_LEAGUE_TOML).unwrap();
        fs::write(
            config_dir.join("credentials.toml"),
            "discord_webhook_url = \"https://discord.com/api/webhooks/1/abc\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load with credentials.toml");
        assert!(config.credentials.has_sink());
        assert_eq!(
            config.credentials.discord_webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_league_id_zero() {
        let (tmp, config_dir) = temp_config_dir("herald_config_id_zero");
        fs::write(
            config_dir.join("league.toml"),
            VALID_LEAGUE_TOML.replace("league_id = 123456", "league_id = 0"),
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "league.league_id");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_timezone() {
        let (tmp, config_dir) = temp_config_dir("herald_config_bad_tz");
        fs::write(
            config_dir.join("league.toml"),
            VALID_LEAGUE_TOML.replace("America/New_York", "Mars/Olympus_Mons"),
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "league.timezone");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_espn_s2_without_swid() {
        let (tmp, config_dir) = temp_config_dir("herald_config_half_cookie");
        fs::write(config_dir.join("league.toml"), VALID_LEAGUE_TOML).unwrap();
        fs::write(
            config_dir.join("credentials.toml"),
            "espn_s2 = \"AEB...\"\n",
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "credentials.espn_s2");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let (tmp, _config_dir) = temp_config_dir("herald_config_missing_league");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("league.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let (tmp, config_dir) = temp_config_dir("herald_config_invalid_toml");
        fs::write(config_dir.join("league.toml"), "this is not valid [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("league.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("herald_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("league.toml"), VALID_LEAGUE_TOML).unwrap();
        fs::write(
            defaults_dir.join("credentials.toml.example"),
            "espn_s2 = \"...\"\nswid = \"{...}\"\n",
        )
        .unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/league.toml").exists());
        // example file should NOT have been copied
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("herald_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(defaults_dir.join("league.toml"), VALID_LEAGUE_TOML).unwrap();

        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        let content = fs::read_to_string(config_dir.join("league.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("herald_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
