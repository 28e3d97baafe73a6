use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{validate_finite, validate_non_negative, validate_positive};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiRequest {
    pub initial_investment: f64,
    pub final_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub initial_investment: f64,
    pub final_value: f64,
    pub roi: f64,
}

impl Roi {
    /// Positive for a gain, negative for a loss.
    pub fn profit(&self) -> f64 {
        self.final_value - self.initial_investment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedRoiRequest {
    pub initial_investment: f64,
    pub final_value: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedRoi {
    pub initial_investment: f64,
    pub final_value: f64,
    pub years: f64,
    pub total_roi: f64,
    pub annualized_roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub name: String,
    pub initial_investment: f64,
    pub final_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiComparisonEntry {
    pub name: String,
    pub initial_investment: f64,
    pub final_value: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiComparison {
    pub entries: Vec<RoiComparisonEntry>,
}

impl RoiComparison {
    pub fn best(&self) -> Option<&RoiComparisonEntry> {
        self.entries
            .iter()
            .max_by(|a, b| a.roi.total_cmp(&b.roi))
    }
}

pub const MIN_COMPARED_INVESTMENTS: usize = 2;

pub fn simple_roi(request: &RoiRequest) -> Result<Roi> {
    let initial = validate_positive("initial investment", request.initial_investment)?;
    let final_value = validate_finite("final value", request.final_value)?;

    Ok(Roi {
        initial_investment: initial,
        final_value,
        roi: (final_value - initial) / initial * 100.0,
    })
}

pub fn annualized_roi(request: &AnnualizedRoiRequest) -> Result<AnnualizedRoi> {
    let initial = validate_positive("initial investment", request.initial_investment)?;
    let final_value = validate_non_negative("final value", request.final_value)?;
    let years = validate_positive("time period", request.years)?;

    Ok(AnnualizedRoi {
        initial_investment: initial,
        final_value,
        years,
        total_roi: (final_value - initial) / initial * 100.0,
        annualized_roi: ((final_value / initial).powf(1.0 / years) - 1.0) * 100.0,
    })
}

pub fn compare(investments: &[Investment]) -> Result<RoiComparison> {
    if investments.len() < MIN_COMPARED_INVESTMENTS {
        return Err(CalcError::domain(format!(
            "comparison needs at least {} investments (got {})",
            MIN_COMPARED_INVESTMENTS,
            investments.len()
        )));
    }

    let entries = investments
        .iter()
        .map(|investment| {
            let roi = simple_roi(&RoiRequest {
                initial_investment: investment.initial_investment,
                final_value: investment.final_value,
            })
            .map_err(|e| CalcError::domain(format!("{}: {}", investment.name, e)))?;

            Ok(RoiComparisonEntry {
                name: investment.name.clone(),
                initial_investment: roi.initial_investment,
                final_value: roi.final_value,
                roi: roi.roi,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RoiComparison { entries })
}
