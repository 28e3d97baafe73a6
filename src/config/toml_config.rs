use crate::core::gpa::{Grade, GradeScale};
use crate::domain::ports::{ConfigProvider, MAX_HISTORY_ENTRIES};
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{validate_limit, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub gpa: GpaConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_dir")]
    pub directory: String,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            directory: default_history_dir(),
            max_entries: default_max_entries(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub directory: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpaConfig {
    /// Built-in scale name (`us`, `uk`); ignored when `grades` is set.
    pub scale: Option<String>,
    pub name: Option<String>,
    pub grades: Option<Vec<Grade>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_history_dir() -> String {
    "./.percent-calc/history".to_string()
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_max_entries() -> usize {
    MAX_HISTORY_ENTRIES
}

fn default_true() -> bool {
    true
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| CalcError::ConfigError {
                message: format!("cannot read {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CalcError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn grade_scale(&self) -> Result<GradeScale> {
        if let Some(grades) = &self.gpa.grades {
            let scale = GradeScale {
                name: self
                    .gpa
                    .name
                    .clone()
                    .unwrap_or_else(|| "Custom".to_string()),
                grades: grades.clone(),
            };
            scale.validate()?;
            return Ok(scale);
        }

        match &self.gpa.scale {
            None => Ok(GradeScale::default()),
            Some(name) => GradeScale::builtin(name).ok_or_else(|| CalcError::InvalidConfigValueError {
                field: "gpa.scale".to_string(),
                value: name.clone(),
                reason: "Unknown grade scale. Valid scales: us, uk".to_string(),
            }),
        }
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn history_dir(&self) -> &str {
        &self.history.directory
    }

    fn history_limit(&self) -> usize {
        self.history.max_entries
    }

    fn history_enabled(&self) -> bool {
        self.history.enabled
    }

    fn export_dir(&self) -> &str {
        &self.export.directory
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("history.directory", &self.history.directory)?;
        validate_path("export.directory", &self.export.directory)?;
        validate_limit(
            "history.max_entries",
            self.history.max_entries,
            1,
            MAX_HISTORY_ENTRIES,
        )?;
        self.grade_scale()?;
        Ok(())
    }
}
