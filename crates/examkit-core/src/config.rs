//! examkit configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level examkit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamkitConfig {
    /// How many of a student's latest results feed `recent_performance`.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output format used when a command is not given one.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Maximum leaderboard rows printed to the console (None = all).
    #[serde(default)]
    pub leaderboard_limit: Option<usize>,
}

fn default_recent_window() -> usize {
    3
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./examkit-results")
}
fn default_format() -> String {
    "text".to_string()
}

impl Default for ExamkitConfig {
    fn default() -> Self {
        Self {
            recent_window: default_recent_window(),
            output_dir: default_output_dir(),
            default_format: default_format(),
            leaderboard_limit: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `examkit.toml` in the current directory
/// 2. `~/.config/examkit/config.toml`
///
/// Environment variable overrides: `EXAMKIT_OUTPUT_DIR`, `EXAMKIT_RECENT_WINDOW`.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamkitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examkit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamkitConfig::default(),
    };

    if let Ok(dir) = std::env::var("EXAMKIT_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Ok(window) = std::env::var("EXAMKIT_RECENT_WINDOW") {
        config.recent_window = window
            .trim()
            .parse()
            .with_context(|| format!("invalid EXAMKIT_RECENT_WINDOW: '{window}'"))?;
    }

    Ok(config)
}

/// Parse a TOML config string, resolving `${VAR}` references in string fields.
pub fn parse_config_str(content: &str) -> Result<ExamkitConfig> {
    let mut config: ExamkitConfig = toml::from_str(content)?;
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    config.default_format = resolve_env_vars(&config.default_format);
    anyhow::ensure!(config.recent_window >= 1, "recent_window must be at least 1");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examkit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMKIT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EXAMKIT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EXAMKIT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_vars"), "no_vars");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_EXAMKIT_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = ExamkitConfig::default();
        assert_eq!(config.recent_window, 3);
        assert_eq!(config.default_format, "text");
        assert!(config.leaderboard_limit.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
recent_window = 5
output_dir = "out/reports"
default_format = "json"
leaderboard_limit = 20
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.recent_window, 5);
        assert_eq!(config.output_dir, PathBuf::from("out/reports"));
        assert_eq!(config.default_format, "json");
        assert_eq!(config.leaderboard_limit, Some(20));
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config.recent_window, 3);
        assert_eq!(config.output_dir, PathBuf::from("./examkit-results"));
    }

    #[test]
    fn zero_recent_window_rejected() {
        assert!(parse_config_str("recent_window = 0").is_err());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examkit.toml");
        std::fs::write(&path, "leaderboard_limit = 3\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.leaderboard_limit, Some(3));
    }
}
