//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::GradeBand;

/// Top-level brightpen configuration (`brightpen.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite file holding practice records.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Dataset file or directory; the built-in seed when unset.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    /// Grade band used for the lexicon and for rule selection.
    #[serde(default)]
    pub grade: GradeBand,
    /// Student the records are saved under.
    #[serde(default = "default_student_id")]
    pub student_id: String,
}

fn default_database() -> PathBuf {
    PathBuf::from("writing_assistant.db")
}

fn default_student_id() -> String {
    "default_student".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            dataset: None,
            grade: GradeBand::default(),
            student_id: default_student_id(),
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
        result = format!(
            "{}{}{}",
            &result[..start],
            value,
            &result[start + end + 1..]
        );
    }
    result
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order when `path` is `None`:
/// 1. `brightpen.toml` in the current directory
/// 2. `~/.config/brightpen/config.toml`
///
/// Environment variable overrides: `BRIGHTPEN_DATABASE`, `BRIGHTPEN_GRADE`.
pub fn load_config_from(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("brightpen.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<AppConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(db) = std::env::var("BRIGHTPEN_DATABASE") {
        config.database = PathBuf::from(db);
    }
    if let Ok(grade) = std::env::var("BRIGHTPEN_GRADE") {
        config.grade = GradeBand::new(grade);
    }

    config.database = PathBuf::from(resolve_env_vars(&config.database.to_string_lossy()));
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("brightpen"))
}

/// Starter `brightpen.toml` written by `brightpen init`.
pub fn default_config_toml() -> String {
    format!(
        r#"# brightpen configuration

# SQLite file for practice records. ${{VAR}} references are expanded.
database = "writing_assistant.db"

# Dataset TOML file or directory. Leave unset to use the built-in seed.
# dataset = "data"

grade = "{}"
student_id = "default_student"
"#,
        GradeBand::default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_BRIGHTPEN_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_BRIGHTPEN_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_BRIGHTPEN_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_BRIGHTPEN_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.grade.as_str(), "3-6年級");
        assert_eq!(config.student_id, "default_student");
        assert!(config.dataset.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
database = "records.db"
grade = "4-6年級"
"#,
        )
        .unwrap();
        assert_eq!(config.database, PathBuf::from("records.db"));
        assert_eq!(config.grade, GradeBand::from("4-6年級"));
        assert_eq!(config.student_id, "default_student");
    }

    #[test]
    fn starter_config_parses() {
        let config: AppConfig = toml::from_str(&default_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brightpen.toml");
        std::fs::write(&path, "student_id = \"amy\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.student_id, "amy");

        let missing = dir.path().join("nope.toml");
        assert!(load_config_from(Some(&missing)).is_err());
    }
}
