//! Static rate tables used by the estimator.
//!
//! Every rate is a percentage (`15` means 15 %). Bases are fractions of
//! annual revenue.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Simples Nacional IRPJ band: applies while revenue is at most `up_to`.
/// The last band has no upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplesTier {
    pub up_to: Option<Decimal>,
    pub rate: Decimal,
}

/// Rate of the open-ended top band.
pub const SIMPLES_TOP_RATE: Decimal = dec!(6.84);

pub const SIMPLES_IRPJ_TIERS: &[SimplesTier] = &[
    SimplesTier {
        up_to: Some(dec!(180000)),
        rate: dec!(4.0),
    },
    SimplesTier {
        up_to: Some(dec!(360000)),
        rate: dec!(5.47),
    },
    SimplesTier {
        up_to: None,
        rate: SIMPLES_TOP_RATE,
    },
];

pub const IRPJ_RATE: Decimal = dec!(15);
pub const CSLL_RATE: Decimal = dec!(9);

/// Presumed-profit base for IRPJ/CSLL.
pub const PRESUMED_PROFIT_BASE: Decimal = dec!(0.32);
/// Margin estimate used as the actual-profit base.
pub const REAL_PROFIT_MARGIN: Decimal = dec!(0.12);

pub const PIS_CUMULATIVE_RATE: Decimal = dec!(0.65);
pub const COFINS_CUMULATIVE_RATE: Decimal = dec!(3.0);
pub const PIS_NON_CUMULATIVE_RATE: Decimal = dec!(1.65);
pub const COFINS_NON_CUMULATIVE_RATE: Decimal = dec!(7.6);

/// Municipal average; real ISS rates range from 2 % to 5 %.
pub const ISS_RATE: Decimal = dec!(5);

pub const INSS_EMPLOYER_RATE: Decimal = dec!(20);
/// Estimated payroll as a share of revenue.
pub const ESTIMATED_PAYROLL_SHARE: Decimal = dec!(0.30);

/// Applied when a state code has no entry in [`ICMS_RATES`].
pub const ICMS_DEFAULT_RATE: Decimal = dec!(18);

pub const ICMS_RATES: &[(&str, Decimal)] = &[
    ("SP", dec!(18)),
    ("RJ", dec!(20)),
    ("MG", dec!(18)),
    ("RS", dec!(17)),
    ("PR", dec!(19)),
    ("SC", dec!(17)),
    ("BA", dec!(19)),
    ("GO", dec!(17)),
    ("PE", dec!(18)),
    ("CE", dec!(18)),
    ("PA", dec!(17)),
    ("MA", dec!(18)),
    ("PB", dec!(18)),
    ("ES", dec!(17)),
    ("PI", dec!(18)),
    ("AL", dec!(18)),
    ("SE", dec!(18)),
    ("RN", dec!(18)),
    ("MT", dec!(17)),
    ("MS", dec!(17)),
    ("DF", dec!(18)),
    ("TO", dec!(18)),
    ("AC", dec!(17)),
    ("RO", dec!(17.5)),
    ("RR", dec!(17)),
    ("AP", dec!(18)),
    ("AM", dec!(18)),
];

/// IRPJ rate for a Simples Nacional company with the given annual revenue.
pub fn simples_irpj_rate(annual_revenue: Decimal) -> Decimal {
    SIMPLES_IRPJ_TIERS
        .iter()
        .find(|tier| tier.up_to.is_none_or(|limit| annual_revenue <= limit))
        .map(|tier| tier.rate)
        .unwrap_or(SIMPLES_TOP_RATE)
}

/// ICMS rate for a state code. Unlisted codes fall back to
/// [`ICMS_DEFAULT_RATE`].
pub fn icms_rate(state: &str) -> Decimal {
    ICMS_RATES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(state.trim()))
        .map(|(_, rate)| *rate)
        .unwrap_or(ICMS_DEFAULT_RATE)
}
