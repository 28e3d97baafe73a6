use crate::core::body_fat::{BodyFat, BodyFatRequest};
use crate::core::commerce::{Discount, DiscountRequest, Tax, TaxRequest};
use crate::core::conversion::{Conversion, ConversionRequest};
use crate::core::gpa::{
    Course, CumulativeGpa, CumulativeGpaRequest, GpaPrediction, GpaPredictionRequest,
    PerformanceAnalysis, TargetGpa, TargetGpaRequest, Term, TermGpa,
};
use crate::core::percentage::{
    ChangeOperation, ChangeRequest, PercentageChange, SimplePercentage, SimplePercentageRequest,
};
use crate::core::roi::{AnnualizedRoi, AnnualizedRoiRequest, Investment, Roi, RoiComparison, RoiRequest};
use crate::core::statistics::{Statistics, StatisticsRequest};
use crate::utils::error::CalcError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// History lists are kept per calculator group, each under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Basic,
    Commerce,
    Roi,
    Gpa,
    BodyFat,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 5] = [
        CalculatorKind::Basic,
        CalculatorKind::Commerce,
        CalculatorKind::Roi,
        CalculatorKind::Gpa,
        CalculatorKind::BodyFat,
    ];

    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Basic => "basic-calculator-history",
            Self::Commerce => "commerce-calculator-history",
            Self::Roi => "roi-calculator-history",
            Self::Gpa => "gpa-calculator-history",
            Self::BodyFat => "body-fat-calculator-history",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Commerce => "commerce",
            Self::Roi => "roi",
            Self::Gpa => "gpa",
            Self::BodyFat => "body-fat",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalculatorKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| CalcError::parse("calculator", s))
    }
}

/// Ephemeral input of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationRequest {
    Simple(SimplePercentageRequest),
    Change(ChangeRequest),
    Convert(ConversionRequest),
    Statistics(StatisticsRequest),
    Discount(DiscountRequest),
    Tax(TaxRequest),
    Roi(RoiRequest),
    AnnualizedRoi(AnnualizedRoiRequest),
    RoiComparison { investments: Vec<Investment> },
    TermGpa { courses: Vec<Course> },
    CumulativeGpa(CumulativeGpaRequest),
    TargetGpa(TargetGpaRequest),
    GpaPrediction(GpaPredictionRequest),
    PerformanceAnalysis { terms: Vec<Term> },
    BodyFat(BodyFatRequest),
}

/// Outcome of a successful calculation, one variant per result shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Calculation {
    Simple(SimplePercentage),
    Change(PercentageChange),
    Convert(Conversion),
    Statistics(Statistics),
    Discount(Discount),
    Tax(Tax),
    Roi(Roi),
    AnnualizedRoi(AnnualizedRoi),
    RoiComparison(RoiComparison),
    TermGpa(TermGpa),
    CumulativeGpa(CumulativeGpa),
    TargetGpa(TargetGpa),
    GpaPrediction(GpaPrediction),
    PerformanceAnalysis(PerformanceAnalysis),
    BodyFat(BodyFat),
}

impl Calculation {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            Self::Simple(_) | Self::Change(_) | Self::Convert(_) | Self::Statistics(_) => {
                CalculatorKind::Basic
            }
            Self::Discount(_) | Self::Tax(_) => CalculatorKind::Commerce,
            Self::Roi(_) | Self::AnnualizedRoi(_) | Self::RoiComparison(_) => CalculatorKind::Roi,
            Self::TermGpa(_)
            | Self::CumulativeGpa(_)
            | Self::TargetGpa(_)
            | Self::GpaPrediction(_)
            | Self::PerformanceAnalysis(_) => CalculatorKind::Gpa,
            Self::BodyFat(_) => CalculatorKind::BodyFat,
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(r) => f.write_str(&r.formula),
            Self::Change(r) => match r.operation {
                ChangeOperation::Change => write!(
                    f,
                    "{} ({} → {})",
                    r.signed_percentage(),
                    r.from,
                    r.to
                ),
                ChangeOperation::Difference => write!(
                    f,
                    "{:.2}% difference between {} and {}",
                    r.percentage, r.from, r.to
                ),
                ChangeOperation::Error => write!(
                    f,
                    "{:.2}% error ({} vs expected {})",
                    r.percentage, r.from, r.to
                ),
            },
            Self::Convert(r) => write!(f, "{} {} = {} {}", r.input, r.from, r.converted, r.to),
            Self::Statistics(r) => write!(
                f,
                "n={} mean={:.2} median={:.2} sd={:.2}",
                r.summary.count, r.summary.mean, r.summary.median, r.summary.standard_deviation
            ),
            Self::Discount(r) => write!(
                f,
                "{}% off {:.2} = {:.2} (save {:.2})",
                r.discount_percent, r.original_price, r.final_price, r.discount_amount
            ),
            Self::Tax(r) => write!(
                f,
                "{:.2} + {}% tax = {:.2} (tax {:.2})",
                r.amount, r.tax_rate, r.total_amount, r.tax_amount
            ),
            Self::Roi(r) => write!(
                f,
                "ROI {:.2}% ({:.2} → {:.2})",
                r.roi, r.initial_investment, r.final_value
            ),
            Self::AnnualizedRoi(r) => write!(
                f,
                "Annualized ROI {:.2}% over {} years (total {:.2}%)",
                r.annualized_roi, r.years, r.total_roi
            ),
            Self::RoiComparison(r) => match r.best() {
                Some(best) => write!(
                    f,
                    "Compared {} investments, best: {} at {:.2}%",
                    r.entries.len(),
                    best.name,
                    best.roi
                ),
                None => write!(f, "Compared {} investments", r.entries.len()),
            },
            Self::TermGpa(r) => write!(
                f,
                "Term GPA {:.2} over {} credits",
                r.gpa, r.total_credits
            ),
            Self::CumulativeGpa(r) => write!(
                f,
                "Cumulative GPA {:.2} after {} credits of {}",
                r.gpa, r.new_credits, r.new_grade
            ),
            Self::TargetGpa(r) => write!(
                f,
                "Need {:.2} GPA over {} credits to reach {:.2}",
                r.required_gpa, r.remaining_credits, r.target_gpa
            ),
            Self::GpaPrediction(r) => write!(
                f,
                "Projected GPA {:.2} after {} semesters",
                r.final_gpa(),
                r.semester_gpas.len()
            ),
            Self::PerformanceAnalysis(r) => write!(
                f,
                "Average GPA {:.2} over {} terms ({} courses)",
                r.average_gpa(),
                r.terms.len(),
                r.total_courses()
            ),
            Self::BodyFat(r) => write!(
                f,
                "Body fat {:.1}% ({}, {})",
                r.percentage, r.category, r.measurements.sex
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub calculation: Calculation,
}

impl HistoryEntry {
    pub fn new(id: u64, calculation: Calculation) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            calculation,
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}  {}",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.calculation
        )
    }
}
