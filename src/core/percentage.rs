use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{validate_finite, validate_non_zero};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleOperation {
    /// `percentage`% of `number`
    PercentOf,
    /// `number` as a percentage of `operand`
    WhatPercent,
    IncreaseBy,
    DecreaseBy,
}

impl SimpleOperation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PercentOf => "percentOf",
            Self::WhatPercent => "isWhatPercent",
            Self::IncreaseBy => "increaseBy",
            Self::DecreaseBy => "decreaseBy",
        }
    }

    pub fn operand_label(&self) -> &'static str {
        match self {
            Self::PercentOf => "Percentage",
            Self::WhatPercent => "Total",
            Self::IncreaseBy => "Increase by %",
            Self::DecreaseBy => "Decrease by %",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperation {
    Change,
    Difference,
    Error,
}

impl ChangeOperation {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Change => "Percentage Change",
            Self::Difference => "Percentage Difference",
            Self::Error => "Percentage Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
    NoChange,
}

impl Direction {
    fn between(from: f64, to: f64) -> Self {
        if to > from {
            Self::Increase
        } else if to < from {
            Self::Decrease
        } else {
            Self::NoChange
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
            Self::NoChange => "No change",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplePercentageRequest {
    pub operation: SimpleOperation,
    pub number: f64,
    pub operand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplePercentage {
    pub operation: SimpleOperation,
    pub number: f64,
    pub operand: f64,
    pub value: f64,
    pub formula: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub operation: ChangeOperation,
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageChange {
    pub operation: ChangeOperation,
    pub from: f64,
    pub to: f64,
    pub percentage: f64,
    pub absolute_change: f64,
    pub direction: Direction,
}

impl PercentageChange {
    /// Percentage with an explicit sign for changes, unsigned otherwise.
    pub fn signed_percentage(&self) -> String {
        match self.operation {
            ChangeOperation::Change if self.percentage >= 0.0 => {
                format!("+{:.2}%", self.percentage)
            }
            _ => format!("{:.2}%", self.percentage),
        }
    }
}

pub fn simple(request: &SimplePercentageRequest) -> Result<SimplePercentage> {
    let number = validate_finite("number", request.number)?;
    let operand = validate_finite(request.operation.operand_label(), request.operand)?;

    let (value, formula) = match request.operation {
        SimpleOperation::PercentOf => {
            let value = number * operand / 100.0;
            (value, format!("{}% of {} = {:.2}", operand, number, value))
        }
        SimpleOperation::WhatPercent => {
            validate_non_zero("total", operand)?;
            let value = number / operand * 100.0;
            (value, format!("{} is {:.2}% of {}", number, value, operand))
        }
        SimpleOperation::IncreaseBy => {
            let value = number + number * operand / 100.0;
            (value, format!("{} + {}% = {:.2}", number, operand, value))
        }
        SimpleOperation::DecreaseBy => {
            let value = number - number * operand / 100.0;
            (value, format!("{} - {}% = {:.2}", number, operand, value))
        }
    };

    Ok(SimplePercentage {
        operation: request.operation,
        number,
        operand,
        value,
        formula,
    })
}

pub fn change(request: &ChangeRequest) -> Result<PercentageChange> {
    let from = validate_finite("initial value", request.from)?;
    let to = validate_finite("final value", request.to)?;

    match request.operation {
        ChangeOperation::Change => percentage_change(from, to),
        ChangeOperation::Difference => percentage_difference(from, to),
        ChangeOperation::Error => percentage_error(from, to),
    }
}

/// `(to - from) / |from| * 100`
pub fn percentage_change(from: f64, to: f64) -> Result<PercentageChange> {
    if from == 0.0 {
        return Err(CalcError::domain(
            "initial value cannot be zero for percentage change calculation",
        ));
    }
    let absolute_change = to - from;
    Ok(PercentageChange {
        operation: ChangeOperation::Change,
        from,
        to,
        percentage: absolute_change / from.abs() * 100.0,
        absolute_change,
        direction: Direction::between(from, to),
    })
}

/// `|a - b|` relative to the magnitude of their mean.
pub fn percentage_difference(a: f64, b: f64) -> Result<PercentageChange> {
    let average = (a + b) / 2.0;
    if average == 0.0 {
        return Err(CalcError::domain(
            "percentage difference is undefined when the values sum to zero",
        ));
    }
    let absolute_change = (a - b).abs();
    Ok(PercentageChange {
        operation: ChangeOperation::Difference,
        from: a,
        to: b,
        percentage: absolute_change / average.abs() * 100.0,
        absolute_change,
        direction: Direction::between(a, b),
    })
}

/// Error of `actual` against `expected`, relative to `|expected|`.
pub fn percentage_error(actual: f64, expected: f64) -> Result<PercentageChange> {
    if expected == 0.0 {
        return Err(CalcError::domain(
            "expected value cannot be zero for percentage error calculation",
        ));
    }
    let absolute_change = (expected - actual).abs();
    Ok(PercentageChange {
        operation: ChangeOperation::Error,
        from: actual,
        to: expected,
        percentage: absolute_change / expected.abs() * 100.0,
        absolute_change,
        direction: Direction::between(actual, expected),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_value(operation: SimpleOperation, number: f64, operand: f64) -> f64 {
        simple(&SimplePercentageRequest {
            operation,
            number,
            operand,
        })
        .unwrap()
        .value
    }

    #[test]
    fn test_simple_operations() {
        assert_eq!(simple_value(SimpleOperation::PercentOf, 50.0, 20.0), 10.0);
        assert_eq!(simple_value(SimpleOperation::WhatPercent, 25.0, 200.0), 12.5);
        assert_eq!(simple_value(SimpleOperation::IncreaseBy, 80.0, 25.0), 100.0);
        assert_eq!(simple_value(SimpleOperation::DecreaseBy, 80.0, 25.0), 60.0);
    }

    #[test]
    fn test_simple_formula_text() {
        let result = simple(&SimplePercentageRequest {
            operation: SimpleOperation::PercentOf,
            number: 50.0,
            operand: 20.0,
        })
        .unwrap();
        assert_eq!(result.formula, "20% of 50 = 10.00");
    }

    #[test]
    fn test_what_percent_of_zero() {
        let err = simple(&SimplePercentageRequest {
            operation: SimpleOperation::WhatPercent,
            number: 5.0,
            operand: 0.0,
        })
        .unwrap_err();
        assert!(matches!(err, CalcError::DomainError { .. }));
    }

    #[test]
    fn test_change_fifty_to_seventy_five() {
        let result = percentage_change(50.0, 75.0).unwrap();
        assert_eq!(result.percentage, 50.0);
        assert_eq!(result.absolute_change, 25.0);
        assert_eq!(result.direction, Direction::Increase);
        assert_eq!(result.signed_percentage(), "+50.00%");
    }

    #[test]
    fn test_change_from_negative_uses_magnitude() {
        let result = percentage_change(-50.0, -25.0).unwrap();
        assert_eq!(result.percentage, 50.0);
        assert_eq!(result.direction, Direction::Increase);
    }

    #[test]
    fn test_change_from_zero_is_domain_error() {
        assert!(matches!(
            percentage_change(0.0, 10.0),
            Err(CalcError::DomainError { .. })
        ));
    }

    #[test]
    fn test_difference() {
        let result = percentage_difference(40.0, 60.0).unwrap();
        assert_eq!(result.percentage, 40.0);
        assert_eq!(result.absolute_change, 20.0);
    }

    #[test]
    fn test_difference_with_zero_sum_is_domain_error() {
        assert!(percentage_difference(0.0, 0.0).is_err());
        assert!(percentage_difference(-5.0, 5.0).is_err());
    }

    #[test]
    fn test_difference_negative_mean_is_unsigned() {
        let result = percentage_difference(-40.0, -60.0).unwrap();
        assert_eq!(result.percentage, 40.0);
    }

    #[test]
    fn test_error() {
        let result = percentage_error(98.0, 100.0).unwrap();
        assert!((result.percentage - 2.0).abs() < 1e-12);
        assert!(percentage_error(1.0, 0.0).is_err());
    }

    #[test]
    fn test_change_dispatch_rejects_non_finite() {
        let err = change(&ChangeRequest {
            operation: ChangeOperation::Change,
            from: f64::NAN,
            to: 1.0,
        })
        .unwrap_err();
        assert!(matches!(err, CalcError::ParseError { .. }));
    }
}
