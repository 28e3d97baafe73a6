//! Body-fat estimate using the U.S. Navy circumference method.

use crate::utils::error::{CalcError, Result};
use crate::utils::validation::validate_positive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "Male",
            Self::Female => "Female",
        })
    }
}

impl FromStr for Sex {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(CalcError::parse("sex", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatCategory {
    EssentialFat,
    Athletes,
    Fitness,
    Average,
    AboveAverage,
}

impl BodyFatCategory {
    pub fn classify(percentage: f64, sex: Sex) -> Self {
        let thresholds = match sex {
            Sex::Male => [6.0, 14.0, 18.0, 25.0],
            Sex::Female => [14.0, 21.0, 25.0, 32.0],
        };
        if percentage < thresholds[0] {
            Self::EssentialFat
        } else if percentage < thresholds[1] {
            Self::Athletes
        } else if percentage < thresholds[2] {
            Self::Fitness
        } else if percentage < thresholds[3] {
            Self::Average
        } else {
            Self::AboveAverage
        }
    }
}

impl fmt::Display for BodyFatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EssentialFat => "Essential Fat",
            Self::Athletes => "Athletes",
            Self::Fitness => "Fitness",
            Self::Average => "Average",
            Self::AboveAverage => "Above Average",
        })
    }
}

/// Lengths in centimetres, weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyFatRequest {
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub neck_cm: f64,
    pub waist_cm: f64,
    pub hip_cm: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyFat {
    pub measurements: BodyFatRequest,
    pub percentage: f64,
    pub category: BodyFatCategory,
}

pub fn estimate(request: &BodyFatRequest) -> Result<BodyFat> {
    // Weight is not part of the Navy formula but is still reported.
    validate_positive("weight", request.weight_kg)?;
    let height = validate_positive("height", request.height_cm)?;
    let neck = validate_positive("neck", request.neck_cm)?;
    let waist = validate_positive("waist", request.waist_cm)?;

    let percentage = match request.sex {
        Sex::Male => {
            let girth = waist - neck;
            if girth <= 0.0 {
                return Err(CalcError::domain("waist must be larger than neck"));
            }
            495.0 / (1.0324 - 0.19077 * girth.log10() + 0.15456 * height.log10()) - 450.0
        }
        Sex::Female => {
            let hip = request
                .hip_cm
                .ok_or_else(|| CalcError::parse("hip", "missing"))?;
            let hip = validate_positive("hip", hip)?;
            let girth = waist + hip - neck;
            if girth <= 0.0 {
                return Err(CalcError::domain("waist plus hip must be larger than neck"));
            }
            495.0 / (1.29579 - 0.35004 * girth.log10() + 0.22100 * height.log10()) - 450.0
        }
    };

    if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
        return Err(CalcError::range(format!(
            "estimated body fat {:.1}% is outside 0-100%; check the measurements",
            percentage
        )));
    }

    Ok(BodyFat {
        measurements: *request,
        percentage,
        category: BodyFatCategory::classify(percentage, request.sex),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male(waist: f64) -> BodyFatRequest {
        BodyFatRequest {
            sex: Sex::Male,
            weight_kg: 80.0,
            height_cm: 180.0,
            neck_cm: 38.0,
            waist_cm: waist,
            hip_cm: None,
        }
    }

    #[test]
    fn test_male_estimate() {
        let result = estimate(&male(85.0)).unwrap();
        assert!((result.percentage - 15.9).abs() < 0.5, "got {}", result.percentage);
        assert_eq!(result.category, BodyFatCategory::Fitness);
    }

    #[test]
    fn test_female_requires_hip() {
        let request = BodyFatRequest {
            sex: Sex::Female,
            weight_kg: 60.0,
            height_cm: 165.0,
            neck_cm: 32.0,
            waist_cm: 70.0,
            hip_cm: None,
        };
        assert!(estimate(&request).is_err());

        let with_hip = BodyFatRequest {
            hip_cm: Some(95.0),
            ..request
        };
        let result = estimate(&with_hip).unwrap();
        assert!(result.percentage > 14.0 && result.percentage < 40.0);
    }

    #[test]
    fn test_neck_larger_than_waist_is_domain_error() {
        assert!(matches!(
            estimate(&male(30.0)),
            Err(CalcError::DomainError { .. })
        ));
    }

    #[test]
    fn test_categories() {
        assert_eq!(BodyFatCategory::classify(5.0, Sex::Male), BodyFatCategory::EssentialFat);
        assert_eq!(BodyFatCategory::classify(5.0, Sex::Female), BodyFatCategory::EssentialFat);
        assert_eq!(BodyFatCategory::classify(20.0, Sex::Male), BodyFatCategory::Average);
        assert_eq!(BodyFatCategory::classify(20.0, Sex::Female), BodyFatCategory::Athletes);
        assert_eq!(BodyFatCategory::classify(40.0, Sex::Female), BodyFatCategory::AboveAverage);
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert!("x".parse::<Sex>().is_err());
    }
}
