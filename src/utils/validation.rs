use crate::utils::error::{CalcError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Parses a user-entered number. Blank, non-numeric and non-finite text
/// (`inf`, `NaN`) are all rejected.
pub fn parse_number(field_name: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CalcError::parse(field_name, text)),
    }
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::parse(field_name, value.to_string()))
    }
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<f64> {
    validate_finite(field_name, value)?;
    if value < 0.0 {
        return Err(CalcError::domain(format!(
            "{} cannot be negative (got {})",
            field_name, value
        )));
    }
    Ok(value)
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<f64> {
    validate_finite(field_name, value)?;
    if value <= 0.0 {
        return Err(CalcError::domain(format!(
            "{} must be greater than zero (got {})",
            field_name, value
        )));
    }
    Ok(value)
}

pub fn validate_non_zero(field_name: &str, value: f64) -> Result<f64> {
    validate_finite(field_name, value)?;
    if value == 0.0 {
        return Err(CalcError::domain(format!("{} cannot be zero", field_name)));
    }
    Ok(value)
}

pub fn validate_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<f64> {
    validate_finite(field_name, value)?;
    if value < min || value > max {
        return Err(CalcError::range(format!(
            "{} must be between {} and {} (got {})",
            field_name, min, max, value
        )));
    }
    Ok(value)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if path.contains('\0') {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_limit(field_name: &str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
