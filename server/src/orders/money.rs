//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use rust_decimal::prelude::*;

use shared::models::{DiscountType, PaymentStatus};

use crate::utils::AppError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: f64 = 0.01;

/// Maximum allowed unit price (1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item (9999 pieces or kg)
const MAX_QUANTITY: f64 = 9999.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field_name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Round a monetary value to 2 decimal places, half-up.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Validate the numeric fields of one order line.
pub fn validate_line(quantity: f64, unit_price: f64) -> Result<(), AppError> {
    require_finite(quantity, "quantity")?;
    require_finite(unit_price, "unit_price")?;
    if quantity <= 0.0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    if unit_price < 0.0 {
        return Err(AppError::validation(format!(
            "unit_price must be non-negative, got {unit_price}"
        )));
    }
    if unit_price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "unit_price exceeds maximum allowed ({MAX_PRICE}), got {unit_price}"
        )));
    }
    Ok(())
}

/// Line total: quantity × unit price, raised to the rule's minimum charge.
pub fn line_total(quantity: f64, unit_price: f64, min_charge: f64) -> f64 {
    let qty = Decimal::from_f64(quantity).unwrap_or_default();
    let price = Decimal::from_f64(unit_price).unwrap_or_default();
    let min = Decimal::from_f64(min_charge.max(0.0)).unwrap_or_default();
    let raw = (qty * price).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    raw.max(min).to_f64().unwrap_or(0.0)
}

/// Computed order totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub total_amount: f64,
}

/// Compute subtotal, discount amount and total for a set of line totals.
///
/// Percentage discounts apply to the subtotal; fixed discounts are capped at
/// the subtotal so the total never goes negative.
pub fn compute_totals(
    line_totals: &[f64],
    discount_type: DiscountType,
    discount_value: f64,
) -> Result<OrderTotals, AppError> {
    require_finite(discount_value, "discount_value")?;
    if discount_value < 0.0 {
        return Err(AppError::validation(format!(
            "discount_value must be non-negative, got {discount_value}"
        )));
    }

    let subtotal: Decimal = line_totals
        .iter()
        .filter_map(|v| Decimal::from_f64(*v))
        .sum();
    let subtotal = subtotal.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

    let value = Decimal::from_f64(discount_value).unwrap_or_default();
    let discount = match discount_type {
        DiscountType::None => Decimal::ZERO,
        DiscountType::Percentage => {
            if discount_value > 100.0 {
                return Err(AppError::validation(format!(
                    "percentage discount cannot exceed 100, got {discount_value}"
                )));
            }
            (subtotal * value / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        }
        DiscountType::FixedAmount => value.min(subtotal),
    };

    let total = (subtotal - discount)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

    Ok(OrderTotals {
        subtotal: subtotal.to_f64().unwrap_or(0.0),
        discount_amount: discount.to_f64().unwrap_or(0.0),
        total_amount: total.to_f64().unwrap_or(0.0),
    })
}

/// Derive `amount_due` and `payment_status` from the total and paid amounts.
///
/// Invariant: amount_due = total_amount − amount_paid.
pub fn derive_payment_status(total_amount: f64, amount_paid: f64) -> (f64, PaymentStatus) {
    let total = Decimal::from_f64(total_amount).unwrap_or_default();
    let paid = Decimal::from_f64(amount_paid).unwrap_or_default();
    let due = (total - paid)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO);

    let status = if paid <= Decimal::ZERO && total > Decimal::ZERO {
        PaymentStatus::Unpaid
    } else if due <= Decimal::ZERO {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    };

    (due.to_f64().unwrap_or(0.0), status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_half_away_from_zero() {
        // 10.125 and 10.375 are exactly representable midpoints
        assert_eq!(round2(10.125), 10.13);
        assert_eq!(round2(10.375), 10.38);
        assert_eq!(round2(-10.125), -10.13);
        assert_eq!(round2(10.124), 10.12);
    }

    #[test]
    fn line_total_respects_min_charge() {
        // 0.5 kg at 4.00/kg = 2.00, but minimum charge is 5.00
        assert_eq!(line_total(0.5, 4.0, 5.0), 5.0);
        // Above the minimum, plain multiplication
        assert_eq!(line_total(3.0, 4.0, 5.0), 12.0);
        assert_eq!(line_total(2.0, 1.255, 0.0), 2.51);
    }

    #[test]
    fn validate_line_bounds() {
        assert!(validate_line(1.0, 10.0).is_ok());
        assert!(validate_line(0.0, 10.0).is_err());
        assert!(validate_line(-1.0, 10.0).is_err());
        assert!(validate_line(1.0, -0.01).is_err());
        assert!(validate_line(f64::NAN, 10.0).is_err());
        assert!(validate_line(1.0, f64::INFINITY).is_err());
        assert!(validate_line(10_000.0, 10.0).is_err());
    }

    #[test]
    fn totals_without_discount() {
        let t = compute_totals(&[12.0, 8.5], DiscountType::None, 0.0).unwrap();
        assert_eq!(t.subtotal, 20.5);
        assert_eq!(t.discount_amount, 0.0);
        assert_eq!(t.total_amount, 20.5);
    }

    #[test]
    fn totals_with_percentage_discount() {
        let t = compute_totals(&[30.0, 20.0], DiscountType::Percentage, 10.0).unwrap();
        assert_eq!(t.subtotal, 50.0);
        assert_eq!(t.discount_amount, 5.0);
        assert_eq!(t.total_amount, 45.0);
    }

    #[test]
    fn totals_with_fixed_discount_capped_at_subtotal() {
        let t = compute_totals(&[10.0], DiscountType::FixedAmount, 25.0).unwrap();
        assert_eq!(t.discount_amount, 10.0);
        assert_eq!(t.total_amount, 0.0);
    }

    #[test]
    fn percentage_over_100_rejected() {
        assert!(compute_totals(&[10.0], DiscountType::Percentage, 120.0).is_err());
        assert!(compute_totals(&[10.0], DiscountType::FixedAmount, -1.0).is_err());
    }

    #[test]
    fn payment_status_derivation() {
        let (due, status) = derive_payment_status(45.0, 0.0);
        assert_eq!(due, 45.0);
        assert_eq!(status, PaymentStatus::Unpaid);

        let (due, status) = derive_payment_status(45.0, 20.0);
        assert_eq!(due, 25.0);
        assert_eq!(status, PaymentStatus::Partial);

        let (due, status) = derive_payment_status(45.0, 45.0);
        assert_eq!(due, 0.0);
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn zero_total_order_counts_as_paid() {
        // Fully discounted order: nothing due, nothing to pay
        let (due, status) = derive_payment_status(0.0, 0.0);
        assert_eq!(due, 0.0);
        assert_eq!(status, PaymentStatus::Paid);
    }
}
