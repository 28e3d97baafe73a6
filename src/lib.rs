pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::{Overrides, Settings, TomlConfig};

pub use adapters::{JsonFileHistoryStore, MemoryHistoryStore};
pub use core::engine::CalculatorEngine;
pub use domain::model::{Calculation, CalculationRequest, CalculatorKind, HistoryEntry};
pub use domain::ports::{ConfigProvider, HistoryStore};
pub use utils::error::{CalcError, Result};
