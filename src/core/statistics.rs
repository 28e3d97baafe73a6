//! Descriptive statistics over a small user-entered sample.

use crate::utils::error::{CalcError, Result};
use crate::utils::validation::parse_number;
use serde::{Deserialize, Serialize};

/// Ranks reported by [`summarize`].
pub const PERCENTILE_RANKS: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRequest {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentile {
    pub rank: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub standard_deviation: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Vec<Percentile>,
}

impl Summary {
    pub fn percentile(&self, rank: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub dataset: Vec<f64>,
    pub summary: Summary,
}

/// Splits free text on commas, semicolons and whitespace. Empty fields are
/// skipped, anything else must parse as a finite number.
pub fn parse_sample(text: &str) -> Result<Vec<f64>> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| parse_number("sample value", token))
        .collect()
}

fn check_sample(sample: &[f64]) -> Result<()> {
    if sample.is_empty() {
        return Err(CalcError::domain("statistics need at least one value"));
    }
    if let Some(bad) = sample.iter().find(|v| !v.is_finite()) {
        return Err(CalcError::parse("sample value", bad.to_string()));
    }
    Ok(())
}

fn sorted(sample: &[f64]) -> Vec<f64> {
    let mut values = sample.to_vec();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

pub fn mean(sample: &[f64]) -> Result<f64> {
    check_sample(sample)?;
    Ok(sample.iter().sum::<f64>() / sample.len() as f64)
}

pub fn median(sample: &[f64]) -> Result<f64> {
    check_sample(sample)?;
    Ok(median_of_sorted(&sorted(sample)))
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let n = values.len();
    if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    }
}

/// Population standard deviation (divisor `n`).
pub fn population_std_dev(sample: &[f64]) -> Result<f64> {
    let mean = mean(sample)?;
    // A constant sample has no spread; skip the arithmetic so rounding in
    // the mean cannot leave a tiny positive residue.
    if sample.iter().all(|v| *v == sample[0]) {
        return Ok(0.0);
    }
    if !mean.is_finite() {
        return Err(CalcError::range("sample values are too large to average"));
    }

    // Deviations are divided by the largest one before squaring so that
    // neither tiny nor huge magnitudes underflow or overflow.
    let largest = sample
        .iter()
        .map(|v| (v - mean).abs())
        .fold(0.0_f64, f64::max);
    if !largest.is_finite() {
        return Err(CalcError::range("sample values are too far apart to measure spread"));
    }
    let scaled_variance = sample
        .iter()
        .map(|v| ((v - mean) / largest).powi(2))
        .sum::<f64>()
        / sample.len() as f64;
    Ok(largest * scaled_variance.sqrt())
}

/// Nearest-rank percentile: always one of the sample's own values.
pub fn percentile(sample: &[f64], rank: f64) -> Result<f64> {
    check_sample(sample)?;
    Ok(nearest_rank(&sorted(sample), checked_rank(rank)?))
}

fn checked_rank(rank: f64) -> Result<f64> {
    if !rank.is_finite() || !(0.0..=100.0).contains(&rank) {
        return Err(CalcError::range(format!(
            "percentile rank must be between 0 and 100 (got {})",
            rank
        )));
    }
    Ok(rank)
}

fn nearest_rank(sorted: &[f64], rank: f64) -> f64 {
    let n = sorted.len();
    let position = (rank / 100.0 * n as f64).ceil() as isize - 1;
    let index = position.clamp(0, n as isize - 1) as usize;
    sorted[index]
}

pub fn summarize(sample: &[f64]) -> Result<Summary> {
    check_sample(sample)?;
    let values = sorted(sample);

    let summary = Summary {
        count: values.len(),
        mean: mean(sample)?,
        median: median_of_sorted(&values),
        standard_deviation: population_std_dev(sample)?,
        min: values[0],
        max: values[values.len() - 1],
        percentiles: PERCENTILE_RANKS
            .iter()
            .map(|&rank| Percentile {
                rank,
                value: nearest_rank(&values, rank),
            })
            .collect(),
    };

    tracing::debug!(
        "summarized {} values: mean={}, median={}, sd={}",
        summary.count,
        summary.mean,
        summary.median,
        summary.standard_deviation
    );
    Ok(summary)
}

pub fn analyze(request: &StatisticsRequest) -> Result<Statistics> {
    Ok(Statistics {
        dataset: request.values.clone(),
        summary: summarize(&request.values)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_to_five() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.median, 3.0);
        assert!((summary.standard_deviation - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.percentile(50.0), Some(3.0));
        assert_eq!(summary.percentile(10.0), Some(1.0));
        assert_eq!(summary.percentile(25.0), Some(2.0));
        assert_eq!(summary.percentile(75.0), Some(4.0));
        assert_eq!(summary.percentile(90.0), Some(5.0));
    }

    #[test]
    fn test_empty_sample_is_domain_error() {
        assert!(matches!(summarize(&[]), Err(CalcError::DomainError { .. })));
        assert!(matches!(mean(&[]), Err(CalcError::DomainError { .. })));
        assert!(percentile(&[], 50.0).is_err());
    }

    #[test]
    fn test_single_element() {
        let summary = summarize(&[7.5]).unwrap();
        assert_eq!(summary.mean, 7.5);
        assert_eq!(summary.median, 7.5);
        assert_eq!(summary.standard_deviation, 0.0);
        assert!(summary.percentiles.iter().all(|p| p.value == 7.5));
    }

    #[test]
    fn test_even_median_averages_central_values() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_constant_sample_has_zero_spread() {
        assert_eq!(population_std_dev(&[0.1, 0.1, 0.1]).unwrap(), 0.0);
        assert!(population_std_dev(&[0.1, 0.2]).unwrap() > 0.0);
    }

    #[test]
    fn test_spread_survives_extreme_magnitudes() {
        let tiny = population_std_dev(&[1.0e-200, 2.0e-200]).unwrap();
        assert!(tiny > 0.0);
        assert!((tiny / 0.5e-200 - 1.0).abs() < 1e-12);

        let huge = population_std_dev(&[1.0e308, -1.0e308]).unwrap();
        assert!(huge.is_finite());
        assert!((huge / 1.0e308 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unaveragable_sample_is_range_error() {
        assert_eq!(population_std_dev(&[1.0e308; 3]).unwrap(), 0.0);
        assert!(matches!(
            population_std_dev(&[1.0e308, 1.0e308, 1.0e308, -1.0]),
            Err(CalcError::RangeError { .. })
        ));
    }

    #[test]
    fn test_percentile_rank_bounds() {
        let sample = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&sample, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&sample, 100.0).unwrap(), 3.0);
        assert!(matches!(
            percentile(&sample, 101.0),
            Err(CalcError::RangeError { .. })
        ));
    }

    #[test]
    fn test_parse_sample() {
        assert_eq!(parse_sample("1, 2;3\n4  5").unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(parse_sample(" , ").unwrap(), Vec::<f64>::new());
        assert!(parse_sample("1, two, 3").is_err());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(matches!(
            summarize(&[1.0, f64::NAN]),
            Err(CalcError::ParseError { .. })
        ));
    }
}
