//! Parsers for command-line values.

use std::str::FromStr;

use rust_decimal::Decimal;
use tax_core::{CompanyType, ReferenceMonth, Sector, StateCode};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseRevenueError {
    #[error("revenue is required")]
    Empty,

    #[error("'{0}' is not a valid amount")]
    Invalid(String),

    #[error("'{0}' is ambiguous; write it without grouping or with cents (e.g. 180000 or 180.000,00)")]
    Ambiguous(String),

    #[error("revenue must not be negative (got {0})")]
    Negative(Decimal),
}

/// Parses an amount in reais such as `R$ 180.000,00`, `1,250,000.50` or
/// `1_250_000`.
///
/// An optional `R$` prefix and any `_` are dropped. When both `.` and `,`
/// appear, the last one is the decimal separator and the other groups
/// thousands. A lone separator is decimal (`150,5`, `85000.50`) unless it
/// could equally be grouping (`180.000`), which is rejected as ambiguous.
/// Repeated separators of one kind must group thousands.
pub fn parse_revenue(input: &str) -> Result<Decimal, ParseRevenueError> {
    let trimmed = input.trim();
    let unprefixed = trimmed
        .strip_prefix("R$")
        .or_else(|| trimmed.strip_prefix("r$"))
        .unwrap_or(trimmed)
        .trim();
    let (negative, unsigned) = match unprefixed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, unprefixed),
    };

    let body: String = unsigned.chars().filter(|c| *c != '_').collect();
    if body.is_empty() {
        return Err(ParseRevenueError::Empty);
    }

    let normalized = normalize_separators(&body, trimmed)?;
    let amount = Decimal::from_str(&normalized)
        .map_err(|_| ParseRevenueError::Invalid(trimmed.to_string()))?;
    if negative && amount > Decimal::ZERO {
        return Err(ParseRevenueError::Negative(-amount));
    }
    Ok(amount)
}

/// Rewrites `body` with `.` as the only separator, the decimal point.
fn normalize_separators(
    body: &str,
    original: &str,
) -> Result<String, ParseRevenueError> {
    let invalid = || ParseRevenueError::Invalid(original.to_string());

    match (body.rfind(','), body.rfind('.')) {
        (None, None) => Ok(body.to_string()),
        (Some(comma), Some(dot)) => {
            let (decimal_at, group) = if comma > dot { (comma, '.') } else { (dot, ',') };
            let whole = ungroup(&body[..decimal_at], group).ok_or_else(invalid)?;
            with_fraction(&whole, &body[decimal_at + 1..]).ok_or_else(invalid)
        }
        (Some(_), None) => single_kind(body, ',', original),
        (None, Some(_)) => single_kind(body, '.', original),
    }
}

fn single_kind(
    body: &str,
    separator: char,
    original: &str,
) -> Result<String, ParseRevenueError> {
    let invalid = || ParseRevenueError::Invalid(original.to_string());

    if body.matches(separator).count() > 1 {
        return ungroup(body, separator).ok_or_else(invalid);
    }
    let Some((whole, fraction)) = body.split_once(separator) else {
        return Err(invalid());
    };
    if fraction.len() == 3 && ungroup(body, separator).is_some() {
        return Err(ParseRevenueError::Ambiguous(original.to_string()));
    }
    with_fraction(whole, fraction).ok_or_else(invalid)
}

/// Removes `separator` from a thousands-grouped integer such as `1.234.567`.
fn ungroup(
    digits: &str,
    separator: char,
) -> Option<String> {
    let groups: Vec<&str> = digits.split(separator).collect();
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let (first, rest) = groups.split_first()?;
    if rest.is_empty() {
        return is_digits(first).then(|| first.to_string());
    }
    let first_ok = is_digits(first) && first.len() <= 3 && !first.starts_with('0');
    let rest_ok = rest.iter().all(|g| g.len() == 3 && is_digits(g));
    (first_ok && rest_ok).then(|| groups.concat())
}

fn with_fraction(
    whole: &str,
    fraction: &str,
) -> Option<String> {
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    (is_digits(whole) && is_digits(fraction)).then(|| format!("{whole}.{fraction}"))
}

pub fn parse_company_type(input: &str) -> Result<CompanyType, String> {
    CompanyType::parse(input).ok_or_else(|| {
        let known: Vec<_> = CompanyType::all().iter().map(|t| t.as_str()).collect();
        format!("unknown company type '{input}' (expected one of {})", known.join(", "))
    })
}

pub fn parse_sector(input: &str) -> Result<Sector, String> {
    Sector::parse(input).ok_or_else(|| {
        let known: Vec<_> = Sector::all().iter().map(|s| s.as_str()).collect();
        format!("unknown sector '{input}' (expected one of {})", known.join(", "))
    })
}

pub fn parse_state(input: &str) -> Result<StateCode, String> {
    StateCode::parse(input).ok_or_else(|| format!("unknown state '{input}'"))
}

pub fn parse_reference_month(input: &str) -> Result<ReferenceMonth, String> {
    input.trim().parse().map_err(|e: tax_core::ParseReferenceMonthError| e.to_string())
}
