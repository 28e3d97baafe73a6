use crate::core::gpa::GradeScale;
use crate::core::{body_fat, commerce, conversion, gpa, percentage, roi, statistics};
use crate::domain::model::{Calculation, CalculationRequest, CalculatorKind, HistoryEntry};
use crate::domain::ports::HistoryStore;
use crate::utils::error::Result;

/// Evaluates requests and records successful results in the injected store.
pub struct CalculatorEngine<S: HistoryStore> {
    store: S,
    scale: GradeScale,
    record_history: bool,
}

impl<S: HistoryStore> CalculatorEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            scale: GradeScale::default(),
            record_history: true,
        }
    }

    pub fn with_grade_scale(mut self, scale: GradeScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    pub fn grade_scale(&self) -> &GradeScale {
        &self.scale
    }

    /// Computes `request`; nothing is recorded when it fails.
    pub fn calculate(&mut self, request: &CalculationRequest) -> Result<Calculation> {
        let calculation = match evaluate(request, &self.scale) {
            Ok(calculation) => calculation,
            Err(e) => {
                tracing::warn!("calculation rejected: {}", e);
                return Err(e);
            }
        };

        if self.record_history {
            let entry = self.store.append(calculation.clone())?;
            tracing::debug!("recorded {} history entry #{}", calculation.kind(), entry.id);
        }

        tracing::info!("{}", calculation);
        Ok(calculation)
    }

    pub fn history(&self, kind: CalculatorKind) -> Result<Vec<HistoryEntry>> {
        self.store.get(kind)
    }

    pub fn clear_history(&mut self, kind: CalculatorKind) -> Result<()> {
        self.store.clear(kind)
    }
}

/// Pure dispatch from request to calculator; no history involved.
pub fn evaluate(request: &CalculationRequest, scale: &GradeScale) -> Result<Calculation> {
    let calculation = match request {
        CalculationRequest::Simple(r) => Calculation::Simple(percentage::simple(r)?),
        CalculationRequest::Change(r) => Calculation::Change(percentage::change(r)?),
        CalculationRequest::Convert(r) => Calculation::Convert(conversion::convert(r)?),
        CalculationRequest::Statistics(r) => Calculation::Statistics(statistics::analyze(r)?),
        CalculationRequest::Discount(r) => Calculation::Discount(commerce::discount(r)?),
        CalculationRequest::Tax(r) => Calculation::Tax(commerce::tax(r)?),
        CalculationRequest::Roi(r) => Calculation::Roi(roi::simple_roi(r)?),
        CalculationRequest::AnnualizedRoi(r) => Calculation::AnnualizedRoi(roi::annualized_roi(r)?),
        CalculationRequest::RoiComparison { investments } => {
            Calculation::RoiComparison(roi::compare(investments)?)
        }
        CalculationRequest::TermGpa { courses } => {
            Calculation::TermGpa(gpa::term_gpa(courses, scale)?)
        }
        CalculationRequest::CumulativeGpa(r) => {
            Calculation::CumulativeGpa(gpa::cumulative_gpa(r, scale)?)
        }
        CalculationRequest::TargetGpa(r) => Calculation::TargetGpa(gpa::target_gpa(r, scale)?),
        CalculationRequest::GpaPrediction(r) => Calculation::GpaPrediction(gpa::predict(r)?),
        CalculationRequest::PerformanceAnalysis { terms } => {
            Calculation::PerformanceAnalysis(gpa::performance_analysis(terms, scale)?)
        }
        CalculationRequest::BodyFat(r) => Calculation::BodyFat(body_fat::estimate(r)?),
    };
    Ok(calculation)
}
