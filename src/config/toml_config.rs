use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_FILE: &str = "planner-data.json";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub planner: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub student_id: Option<String>,
    /// Fixes the suggestion RNG when set.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "compact".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                data_file: DEFAULT_DATA_FILE.to_string(),
            },
            planner: EngineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| PlannerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLANNER_DATA})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlannerError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn student_id(&self) -> Option<&str> {
        self.planner.student_id.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.logging.format == "json"
    }
}

impl Validate for PlannerConfig {
    fn validate(&self) -> Result<()> {
        validate_path("store.data_file", &self.store.data_file)?;
        if let Some(student_id) = &self.planner.student_id {
            validate_non_empty_string("planner.student_id", student_id)?;
        }
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[store]
data_file = "./data/planner.json"

[planner]
student_id = "student-1"
seed = 42

[logging]
level = "debug"
format = "json"
"#;

        let config = PlannerConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.store.data_file, "./data/planner.json");
        assert_eq!(config.student_id(), Some("student-1"));
        assert_eq!(config.planner.seed, Some(42));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_sections_default() {
        let config = PlannerConfig::from_toml_str("[store]\ndata_file = \"x.json\"\n").unwrap();

        assert_eq!(config.student_id(), None);
        assert_eq!(config.logging.level, "info");
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DEGREE_PLANNER_TEST_DATA", "/tmp/plan.json");

        let config = PlannerConfig::from_toml_str(
            "[store]\ndata_file = \"${DEGREE_PLANNER_TEST_DATA}\"\n",
        )
        .unwrap();
        assert_eq!(config.store.data_file, "/tmp/plan.json");

        std::env::remove_var("DEGREE_PLANNER_TEST_DATA");
    }

    #[test]
    fn test_unknown_env_var_is_left_in_place() {
        let config = PlannerConfig::from_toml_str(
            "[store]\ndata_file = \"${DEGREE_PLANNER_NOT_SET}\"\n",
        )
        .unwrap();
        assert_eq!(config.store.data_file, "${DEGREE_PLANNER_NOT_SET}");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PlannerConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = PlannerConfig::default();
        config.store.data_file = String::new();
        assert!(config.validate().is_err());

        let mut config = PlannerConfig::default();
        config.planner.student_id = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = PlannerConfig::from_toml_str("[store\n").unwrap_err();
        assert!(matches!(err, PlannerError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[store]\ndata_file = \"seed.json\"\n\n[planner]\nstudent_id = \"s9\"\n")
            .unwrap();

        let config = PlannerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store.data_file, "seed.json");
        assert_eq!(config.student_id(), Some("s9"));
    }
}
