#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use crate::core::gpa::GradeScale;

/// Effective settings after command-line overrides are applied on top of
/// the TOML file (or its defaults).
#[derive(Debug, Clone)]
pub struct Settings {
    pub history_dir: String,
    pub history_limit: usize,
    pub history_enabled: bool,
    pub export_dir: String,
    pub grade_scale: GradeScale,
    pub verbose: bool,
    pub json_logs: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub history_dir: Option<String>,
    pub no_history: bool,
    pub export_dir: Option<String>,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Settings {
    pub fn resolve(file: &TomlConfig, overrides: &Overrides) -> Result<Self> {
        file.validate()?;
        Ok(Self {
            history_dir: overrides
                .history_dir
                .clone()
                .unwrap_or_else(|| file.history_dir().to_string()),
            history_limit: file.history_limit(),
            history_enabled: file.history_enabled() && !overrides.no_history,
            export_dir: overrides
                .export_dir
                .clone()
                .unwrap_or_else(|| file.export_dir().to_string()),
            grade_scale: file.grade_scale()?,
            verbose: overrides.verbose || file.verbose(),
            json_logs: overrides.json_logs || file.json_logs(),
        })
    }
}

impl ConfigProvider for Settings {
    fn history_dir(&self) -> &str {
        &self.history_dir
    }

    fn history_limit(&self) -> usize {
        self.history_limit
    }

    fn history_enabled(&self) -> bool {
        self.history_enabled
    }

    fn export_dir(&self) -> &str {
        &self.export_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_file() {
        let file = TomlConfig::from_toml_str("[history]\ndirectory = \"/from/file\"\n").unwrap();
        let overrides = Overrides {
            history_dir: Some("/from/cli".to_string()),
            no_history: true,
            ..Overrides::default()
        };

        let settings = Settings::resolve(&file, &overrides).unwrap();
        assert_eq!(settings.history_dir(), "/from/cli");
        assert!(!settings.history_enabled());
        assert_eq!(settings.export_dir(), ".");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let file = TomlConfig::from_toml_str("[history]\nmax_entries = 0\n").unwrap();
        assert!(Settings::resolve(&file, &Overrides::default()).is_err());
    }
}
