pub mod body_fat;
pub mod commerce;
pub mod conversion;
pub mod engine;
pub mod export;
pub mod gpa;
pub mod percentage;
pub mod roi;
pub mod statistics;

pub use crate::domain::model::{Calculation, CalculationRequest, CalculatorKind, HistoryEntry};
pub use crate::domain::ports::{ConfigProvider, HistoryStore};
pub use crate::utils::error::Result;
