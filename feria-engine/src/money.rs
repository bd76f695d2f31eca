//! Money helpers using rust_decimal for precision
//!
//! All prices and totals are `Decimal`; amounts surface to users rounded
//! half-up to two decimal places.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Round an amount to the monetary precision
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with exactly two decimals (`95` → `"95.00"`)
///
/// This is the formatting used in the fulfillment message footer and line
/// subtotals; the two-decimal shape is part of that contract.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_amount(amount))
}

/// Parse a free-text price field; unparsable input defaults to zero
pub fn parse_amount(input: &str) -> Decimal {
    input.trim().parse().unwrap_or(Decimal::ZERO)
}

/// Subtotal of one line at the given unit price
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}
