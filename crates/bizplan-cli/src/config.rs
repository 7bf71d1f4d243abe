//! Configuration file management for bizplan.
//!
//! Provides a TOML-based config file at `~/.config/bizplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use bizplan_core::completion::CompletionConfig;
use bizplan_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub completion: CompletionSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CompletionSection {
    /// Bearer token for the completion service. Usually left unset here and
    /// provided via `OPENROUTER_API_KEY` instead.
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the bizplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/bizplan` or `~/.config/bizplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("bizplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("bizplan")
}

/// Return the path to the bizplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Resolved configuration for a command invocation.
///
/// The database side is always resolved; the completion side is kept raw and
/// resolved on demand via [`BizplanConfig::completion_config`], so commands
/// that never call the completion service do not require an API key.
#[derive(Debug)]
pub struct BizplanConfig {
    pub db_config: DbConfig,
    completion: CompletionSection,
}

impl BizplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let db_url = if let Some(url) = cli_db_url {
            url.to_string()
        } else if let Ok(url) = std::env::var("BIZPLAN_DATABASE_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };

        let completion = file_config.map(|c| c.completion).unwrap_or_default();

        Ok(Self {
            db_config: DbConfig::new(db_url),
            completion,
        })
    }

    /// Resolve the completion client configuration.
    ///
    /// API key: `OPENROUTER_API_KEY` env > config file > error. Endpoint and
    /// model: `BIZPLAN_COMPLETION_URL` / `BIZPLAN_COMPLETION_MODEL` env >
    /// config file > default. Output ceiling and timeout come from the
    /// config file or the defaults.
    pub fn completion_config(&self) -> Result<CompletionConfig> {
        let api_key = if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            key
        } else if let Some(key) = self.completion.api_key.clone() {
            key
        } else {
            bail!(
                "completion API key not found; set OPENROUTER_API_KEY or add \
                 completion.api_key to the config file"
            );
        };

        let mut config = CompletionConfig::new(api_key);
        if let Ok(endpoint) = std::env::var("BIZPLAN_COMPLETION_URL") {
            config.endpoint = endpoint;
        } else if let Some(endpoint) = self.completion.endpoint.clone() {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("BIZPLAN_COMPLETION_MODEL") {
            config.model = model;
        } else if let Some(model) = self.completion.model.clone() {
            config.model = model;
        }
        if let Some(max_tokens) = self.completion.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(secs) = self.completion.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_roundtrip() {
        let original = ConfigFile {
            database: DatabaseSection {
                url: "postgresql://testhost:5432/testdb".to_string(),
            },
            completion: CompletionSection {
                api_key: Some("sk-test".to_string()),
                endpoint: None,
                model: Some("test/model".to_string()),
                max_tokens: Some(750),
                timeout_secs: Some(15),
            },
        };

        let serialized = toml::to_string_pretty(&original).expect("should serialize");
        let parsed: ConfigFile = toml::from_str(&serialized).expect("should parse");

        assert_eq!(parsed.database.url, "postgresql://testhost:5432/testdb");
        assert_eq!(parsed.completion.api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.completion.model.as_deref(), Some("test/model"));
        assert_eq!(parsed.completion.max_tokens, Some(750));
        assert_eq!(parsed.completion.timeout_secs, Some(15));
    }

    #[test]
    fn completion_section_is_optional() {
        let parsed: ConfigFile =
            toml::from_str("[database]\nurl = \"postgresql://localhost:5432/bizplan\"\n")
                .expect("should parse without a completion section");
        assert!(parsed.completion.api_key.is_none());
        assert!(parsed.completion.model.is_none());
    }

    #[test]
    fn completion_config_applies_file_overrides() {
        let config = BizplanConfig {
            db_config: DbConfig::new(DbConfig::DEFAULT_URL),
            completion: CompletionSection {
                api_key: Some("sk-from-file".to_string()),
                endpoint: Some("http://localhost:9999/v1/chat/completions".to_string()),
                model: None,
                max_tokens: Some(800),
                timeout_secs: Some(12),
            },
        };

        // Env vars may shadow the file values; only assert on the
        // file-driven fields that have no env override in this process.
        let resolved = config.completion_config().expect("should resolve");
        assert_eq!(resolved.max_tokens, 800);
        assert_eq!(resolved.timeout, Duration::from_secs(12));
    }
}
