//! Conversion between the textual representations of a ratio.
//!
//! Every conversion goes through the canonical decimal form: the input is
//! parsed in its source format, scaled down to a decimal, then rendered in
//! the target format.

use crate::utils::error::{CalcError, Result};
use crate::utils::validation::parse_number;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relative tolerance used when approximating a decimal by a fraction.
pub const FRACTION_TOLERANCE: f64 = 1.0e-6;

const MAX_EXPANSION_STEPS: usize = 64;
const MAX_CONVERGENT: f64 = 1.0e15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioFormat {
    Percentage,
    Decimal,
    Fraction,
    #[serde(rename = "permille")]
    PerMille,
    #[serde(rename = "bps")]
    BasisPoints,
    #[serde(rename = "ppm")]
    PartsPerTenThousand,
}

impl RatioFormat {
    pub const ALL: [RatioFormat; 6] = [
        RatioFormat::Percentage,
        RatioFormat::Decimal,
        RatioFormat::Fraction,
        RatioFormat::PerMille,
        RatioFormat::BasisPoints,
        RatioFormat::PartsPerTenThousand,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Decimal => "decimal",
            Self::Fraction => "fraction",
            Self::PerMille => "permille",
            Self::BasisPoints => "bps",
            Self::PartsPerTenThousand => "ppm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Percentage => "Percentage (%)",
            Self::Decimal => "Decimal",
            Self::Fraction => "Fraction",
            Self::PerMille => "Per mille (‰)",
            Self::BasisPoints => "Basis points (bps)",
            Self::PartsPerTenThousand => "Parts per 10,000 (ppm)",
        }
    }

    /// Multiplier from the canonical decimal to this format.
    pub fn scale(&self) -> f64 {
        match self {
            Self::Percentage => 100.0,
            Self::Decimal | Self::Fraction => 1.0,
            Self::PerMille => 1_000.0,
            Self::BasisPoints | Self::PartsPerTenThousand => 10_000.0,
        }
    }
}

impl fmt::Display for RatioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RatioFormat {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.id() == wanted)
            .ok_or_else(|| CalcError::parse("format", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub value: String,
    pub from: RatioFormat,
    pub to: RatioFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub input: String,
    pub from: RatioFormat,
    pub to: RatioFormat,
    pub decimal: f64,
    pub converted: String,
}

/// Parses `"n/d"`; text without a `/` is read as a plain decimal.
pub fn fraction_to_decimal(text: &str) -> Result<f64> {
    let Some((numerator, denominator)) = text.split_once('/') else {
        return parse_number("fraction", text);
    };

    let numerator = parse_number("fraction numerator", numerator)?;
    let denominator = parse_number("fraction denominator", denominator)?;
    if denominator == 0.0 {
        return Err(CalcError::domain(format!(
            "fraction '{}' has a zero denominator",
            text.trim()
        )));
    }

    Ok(numerator / denominator)
}

/// Best rational approximation of `decimal` by continued-fraction expansion.
///
/// Stops at the first convergent within `FRACTION_TOLERANCE` of the input
/// (relative), when the remainder vanishes, or when the convergents grow
/// beyond what an `i64` can hold exactly. A value whose best convergent is
/// still outside the tolerance is a range error.
pub fn decimal_to_fraction(decimal: f64) -> Result<Fraction> {
    if !decimal.is_finite() {
        return Err(CalcError::domain(format!(
            "cannot express {} as a fraction",
            decimal
        )));
    }
    if decimal == 0.0 {
        return Ok(Fraction {
            numerator: 0,
            denominator: 1,
        });
    }

    let target = decimal.abs();
    let tolerance = target * FRACTION_TOLERANCE;

    let (mut h1, mut h2) = (1.0_f64, 0.0_f64);
    let (mut k1, mut k2) = (0.0_f64, 1.0_f64);
    let mut best = (0.0_f64, 1.0_f64);
    let mut b = target;

    for _ in 0..MAX_EXPANSION_STEPS {
        let a = b.floor();
        let h = a * h1 + h2;
        let k = a * k1 + k2;
        if k == 0.0 || h > MAX_CONVERGENT || k > MAX_CONVERGENT {
            break;
        }
        (h2, h1) = (h1, h);
        (k2, k1) = (k1, k);
        best = (h1, k1);

        if (target - h1 / k1).abs() <= tolerance {
            break;
        }

        let remainder = b - a;
        if remainder <= 0.0 {
            break;
        }
        b = 1.0 / remainder;
    }

    if (target - best.0 / best.1).abs() > tolerance {
        return Err(CalcError::range(format!(
            "{} cannot be written as a fraction with terms below {:e}",
            decimal, MAX_CONVERGENT
        )));
    }

    let numerator = best.0 as i64;
    Ok(Fraction {
        numerator: if decimal < 0.0 { -numerator } else { numerator },
        denominator: best.1 as i64,
    })
}

/// Reads `text` in `format` and returns the canonical decimal.
pub fn parse_value(text: &str, format: RatioFormat) -> Result<f64> {
    let value = match format {
        RatioFormat::Fraction => fraction_to_decimal(text)?,
        _ => parse_number(format.id(), text)?,
    };
    Ok(value / format.scale())
}

pub fn format_ratio(decimal: f64, format: RatioFormat) -> Result<String> {
    let scaled = decimal * format.scale();
    let rendered = match format {
        RatioFormat::Percentage => format!("{:.2}%", scaled),
        RatioFormat::Decimal => format!("{:.4}", scaled),
        RatioFormat::Fraction => decimal_to_fraction(decimal)?.to_string(),
        RatioFormat::PerMille => format!("{:.2}‰", scaled),
        RatioFormat::BasisPoints => format!("{:.0} bps", scaled),
        RatioFormat::PartsPerTenThousand => format!("{:.0} ppm", scaled),
    };
    Ok(rendered)
}

pub fn convert(request: &ConversionRequest) -> Result<Conversion> {
    let decimal = parse_value(&request.value, request.from)?;
    let converted = format_ratio(decimal, request.to)?;
    tracing::debug!(
        "converted {} {} -> {} {}",
        request.value.trim(),
        request.from,
        converted,
        request.to
    );

    Ok(Conversion {
        input: request.value.trim().to_string(),
        from: request.from,
        to: request.to,
        decimal,
        converted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: &str, from: RatioFormat, to: RatioFormat) -> ConversionRequest {
        ConversionRequest {
            value: value.to_string(),
            from,
            to,
        }
    }

    #[test]
    fn test_decimal_to_percentage_and_fraction() {
        let pct = convert(&request("0.75", RatioFormat::Decimal, RatioFormat::Percentage)).unwrap();
        assert_eq!(pct.converted, "75.00%");

        let frac = convert(&request("0.75", RatioFormat::Decimal, RatioFormat::Fraction)).unwrap();
        assert_eq!(frac.converted, "3/4");
    }

    #[test]
    fn test_other_target_formats() {
        let cases = [
            (RatioFormat::Decimal, "0.7500"),
            (RatioFormat::PerMille, "750.00‰"),
            (RatioFormat::BasisPoints, "7500 bps"),
            (RatioFormat::PartsPerTenThousand, "7500 ppm"),
        ];
        for (to, expected) in cases {
            let result = convert(&request("75", RatioFormat::Percentage, to)).unwrap();
            assert_eq!(result.converted, expected, "converting to {}", to);
        }
    }

    #[test]
    fn test_fraction_input() {
        assert_eq!(fraction_to_decimal("3/4").unwrap(), 0.75);
        assert_eq!(fraction_to_decimal(" 1 / 8 ").unwrap(), 0.125);
        assert_eq!(fraction_to_decimal("0.75").unwrap(), 0.75);
        assert!(matches!(
            fraction_to_decimal("3/0"),
            Err(CalcError::DomainError { .. })
        ));
        assert!(matches!(
            fraction_to_decimal("3/"),
            Err(CalcError::ParseError { .. })
        ));
        assert!(fraction_to_decimal("a/b").is_err());
    }

    #[test]
    fn test_decimal_to_fraction_known_values() {
        let cases = [
            (0.5, (1, 2)),
            (1.5, (3, 2)),
            (2.0, (2, 1)),
            (0.125, (1, 8)),
            (-0.75, (-3, 4)),
            (0.0, (0, 1)),
        ];
        for (decimal, (n, d)) in cases {
            let fraction = decimal_to_fraction(decimal).unwrap();
            assert_eq!((fraction.numerator, fraction.denominator), (n, d), "for {}", decimal);
        }
    }

    #[test]
    fn test_decimal_to_fraction_third() {
        let fraction = decimal_to_fraction(1.0 / 3.0).unwrap();
        assert_eq!(fraction.to_string(), "1/3");
    }

    #[test]
    fn test_decimal_to_fraction_irrational_terminates() {
        let fraction = decimal_to_fraction(std::f64::consts::PI).unwrap();
        let error = (fraction.value() - std::f64::consts::PI).abs();
        assert!(error <= std::f64::consts::PI * FRACTION_TOLERANCE);
    }

    #[test]
    fn test_decimal_to_fraction_out_of_reach_is_range_error() {
        for decimal in [2.0e15, -2.0e15, 1.0e-16, 1.0e-300] {
            assert!(
                matches!(decimal_to_fraction(decimal), Err(CalcError::RangeError { .. })),
                "for {}",
                decimal
            );
        }
        assert!(matches!(
            convert(&request("1e-16", RatioFormat::Decimal, RatioFormat::Fraction)),
            Err(CalcError::RangeError { .. })
        ));
    }

    #[test]
    fn test_decimal_to_fraction_large_integer() {
        let fraction = decimal_to_fraction(1.0e14).unwrap();
        assert_eq!((fraction.numerator, fraction.denominator), (100_000_000_000_000, 1));
    }

    #[test]
    fn test_decimal_to_fraction_rejects_non_finite() {
        assert!(decimal_to_fraction(f64::NAN).is_err());
        assert!(decimal_to_fraction(f64::INFINITY).is_err());
    }

    #[test]
    fn test_invalid_input_produces_no_result() {
        let err = convert(&request("seventy", RatioFormat::Percentage, RatioFormat::Decimal))
            .unwrap_err();
        assert!(matches!(err, CalcError::ParseError { .. }));
    }

    #[test]
    fn test_format_ids_round_trip_through_from_str() {
        for format in RatioFormat::ALL {
            assert_eq!(format.id().parse::<RatioFormat>().unwrap(), format);
        }
        assert!("furlongs".parse::<RatioFormat>().is_err());
    }
}
