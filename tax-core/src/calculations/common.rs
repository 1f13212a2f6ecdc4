//! Common utility functions for tax calculations.
//!
//! Shared arithmetic and formatting used by the estimator and by anything
//! that presents its output.

use rust_decimal::{Decimal, RoundingStrategy};

/// Applies a percentage rate to a base amount: `base × rate / 100`.
///
/// No rounding is applied; estimated values keep full decimal precision.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(100000), dec!(0.65)), dec!(650));
/// assert_eq!(percent_of(dec!(32000), dec!(15)), dec!(4800));
/// ```
pub fn percent_of(
    base: Decimal,
    rate: Decimal,
) -> Decimal {
    base * rate / Decimal::ONE_HUNDRED
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount the Brazilian way: `.` groups thousands, `,` separates
/// the two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_brl;
///
/// assert_eq!(format_brl(dec!(1234567.891)), "1.234.567,89");
/// assert_eq!(format_brl(dec!(0)), "0,00");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let negative = rounded < Decimal::ZERO;
    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped},{fraction}")
    } else {
        format!("{grouped},{fraction}")
    }
}

/// Formats a percentage rate without trailing zeros (`17.5`, `18`, `0.65`).
pub fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}
