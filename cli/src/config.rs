// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use cical_ical::ParseOptions;
use tokio::fs;

use crate::cli::APP_NAME;
use crate::render::OutputFormat;

const CICAL_CONFIG_ENV: &str = "CICAL_CONFIG";

/// Load the configuration.
///
/// Lookup order: the explicit `path`, the `CICAL_CONFIG` environment variable,
/// then `cical/config.toml` in the user configuration directory. A missing
/// default file yields [`Config::default`]; a missing explicit file is an error.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(CICAL_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let Some(config) = get_config_dir().map(|a| a.join(format!("{APP_NAME}/config.toml")))
        else {
            tracing::debug!("user-specific config directory not found, using defaults");
            return Ok(Config::default());
        };
        if !config.exists() {
            tracing::debug!(path = %config.display(), "no config found, using defaults");
            return Ok(Config::default());
        }
        config
    };

    fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse()
}

/// Configuration for cical.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The `[parser]` table
    pub parser: ParserConfig,

    /// The `[output]` table
    pub output: OutputConfig,
}

impl FromStr for Config {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Reject `END` lines naming a component other than the open one
    pub strict_nesting: bool,

    /// Maximum logical line length in bytes, unset or `0` for unlimited
    pub max_line_length: Option<usize>,

    /// Maximum nesting depth, `0` for unlimited
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_nesting: false,
            max_line_length: None,
            max_depth: ParseOptions::DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Convert to the parser options.
    pub fn options(&self) -> ParseOptions {
        ParseOptions::default()
            .strict_nesting(self.strict_nesting)
            .max_line_length(self.max_line_length.and_then(unlimited_if_zero))
            .max_depth(unlimited_if_zero(self.max_depth))
    }
}

/// Output settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Format used when no selector flag is given
    pub format: OutputFormat,

    /// Decode TEXT escapes in JSON and Markdown output
    pub unescape_text: bool,
}

fn unlimited_if_zero(limit: usize) -> Option<usize> {
    (limit != 0).then_some(limit)
}

fn get_config_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::OnceLock;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn parses_full_config() {
        let config: Config = r#"
[parser]
strict_nesting = true
max_line_length = 4096
max_depth = 0

[output]
format = "json"
unescape_text = true
"#
        .parse()
        .unwrap();

        assert_eq!(
            config,
            Config {
                parser: ParserConfig {
                    strict_nesting: true,
                    max_line_length: Some(4096),
                    max_depth: 0,
                },
                output: OutputConfig {
                    format: OutputFormat::Json,
                    unescape_text: true,
                },
            }
        );

        let options = config.parser.options();
        assert!(options.strict_nesting);
        assert_eq!(options.max_line_length, Some(4096));
        assert_eq!(options.max_depth, None);
    }

    #[test]
    fn empty_config_is_default() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert_eq!(config.parser.options(), ParseOptions::default());
    }

    #[test]
    fn zero_limits_mean_unlimited() {
        let config: Config = "[parser]\nmax_line_length = 0\nmax_depth = 0\n"
            .parse()
            .unwrap();
        let options = config.parser.options();
        assert_eq!(options.max_line_length, None);
        assert_eq!(options.max_depth, None);

        let config: Config = "[parser]\nmax_line_length = 75\n".parse().unwrap();
        let options = config.parser.options();
        assert_eq!(options.max_line_length, Some(75));
        assert_eq!(options.max_depth, Some(ParseOptions::DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn rejects_invalid_config() {
        assert!("[output]\nformat = \"yaml\"\n".parse::<Config>().is_err());
        assert!("[parser]\nunknown = 1\n".parse::<Config>().is_err());
    }

    #[tokio::test]
    async fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[output]\nformat = \"ics\"\n").unwrap();

        let env_path = temp_dir.path().join("env_config.toml");
        fs::write(&env_path, "[output]\nformat = \"json\"\n").unwrap();

        {
            let _guard = env_lock().lock().await;
            unsafe {
                std::env::set_var(CICAL_CONFIG_ENV, env_path.to_str().unwrap());
            }

            let config = parse_config(Some(config_path.clone())).await.unwrap();
            assert_eq!(config.output.format, OutputFormat::Ics);

            unsafe {
                std::env::remove_var(CICAL_CONFIG_ENV);
            }
        }
    }

    #[tokio::test]
    async fn env_var_overrides_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let env_config_path = temp_dir.path().join("env_config.toml");
        fs::write(&env_config_path, "[parser]\nmax_depth = 8\n").unwrap();

        {
            let _guard = env_lock().lock().await;
            unsafe {
                std::env::set_var(CICAL_CONFIG_ENV, env_config_path.to_str().unwrap());
            }

            let config = parse_config(None).await.unwrap();
            assert_eq!(config.parser.max_depth, 8);
            assert_eq!(config.parser.options().max_depth, Some(8));

            unsafe {
                std::env::remove_var(CICAL_CONFIG_ENV);
            }
        }
    }

    #[tokio::test]
    async fn missing_explicit_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");

        let err = parse_config(Some(missing)).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
