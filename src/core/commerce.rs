use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative, validate_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRequest {
    pub original_price: f64,
    pub discount_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub original_price: f64,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub final_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxRequest {
    pub amount: f64,
    pub tax_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub amount: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

pub fn discount(request: &DiscountRequest) -> Result<Discount> {
    let price = validate_non_negative("original price", request.original_price)?;
    let percent = validate_range("discount", request.discount_percent, 0.0, 100.0)?;

    let discount_amount = price * percent / 100.0;
    Ok(Discount {
        original_price: price,
        discount_percent: percent,
        discount_amount,
        final_price: price - discount_amount,
    })
}

pub fn tax(request: &TaxRequest) -> Result<Tax> {
    let amount = validate_non_negative("amount", request.amount)?;
    let rate = validate_non_negative("tax rate", request.tax_rate)?;

    let tax_amount = amount * rate / 100.0;
    Ok(Tax {
        amount,
        tax_rate: rate,
        tax_amount,
        total_amount: amount + tax_amount,
    })
}
