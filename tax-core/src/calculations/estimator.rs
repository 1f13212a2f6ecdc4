//! Estimated tax obligations for a Brazilian client profile.
//!
//! Each tax is evaluated on its own and included only when it applies to
//! the client's regime and sector. Line items always come out in the same
//! order:
//!
//! | Tax           | Applies to                         | Base                         |
//! |---------------|------------------------------------|------------------------------|
//! | IRPJ          | every company (not individuals)    | revenue, or presumed/real base |
//! | CSLL          | presumed and real profit companies | presumed/real base           |
//! | PIS, COFINS   | everyone except Simples Nacional   | revenue                      |
//! | ICMS          | trade and industry                 | revenue                      |
//! | ISS           | services                           | revenue                      |
//! | INSS Patronal | presumed and real profit companies | estimated payroll            |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEstimator;
//! use tax_core::clock::{FixedClock, SequentialIds};
//! use tax_core::{ClientProfile, CompanyType, ReferenceMonth, Sector, StateCode};
//!
//! let now = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
//! let estimator = TaxEstimator::new(Arc::new(FixedClock(now)), Arc::new(SequentialIds::new("calc")));
//!
//! let profile = ClientProfile {
//!     id: "client-1".to_string(),
//!     name: "Studio Lima".to_string(),
//!     company_type: CompanyType::PresumedProfitCorp,
//!     annual_revenue: dec!(100000),
//!     state: StateCode::SP,
//!     sector: Sector::Services,
//!     reference_date: ReferenceMonth::new(2025, 3).unwrap(),
//!     created_at: now,
//! };
//!
//! let calculation = estimator.estimate(profile);
//!
//! assert_eq!(calculation.line_items.len(), 6);
//! assert_eq!(calculation.total_estimated, dec!(22330));
//! ```

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{format_brl, format_rate, percent_of};
use crate::calculations::rates;
use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::models::{
    ClientProfile, CompanyType, DueDate, Sector, TaxCalculation, TaxCategory, TaxLineItem,
};

pub const IRPJ: &str = "IRPJ";
pub const CSLL: &str = "CSLL";
pub const PIS: &str = "PIS";
pub const COFINS: &str = "COFINS";
pub const ICMS: &str = "ICMS";
pub const ISS: &str = "ISS";
pub const INSS_EMPLOYER: &str = "INSS Patronal";

/// How many tax names the summary sentence lists before " and others".
pub const SUMMARY_TAX_NAMES: usize = 3;

/// Turns client profiles into tax calculations.
///
/// Holds only the id and time sources; the tax content of a calculation
/// depends on nothing but the profile.
#[derive(Clone)]
pub struct TaxEstimator {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl TaxEstimator {
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { clock, ids }
    }

    /// Computes every applicable tax for `profile`. Never fails.
    pub fn estimate(
        &self,
        profile: ClientProfile,
    ) -> TaxCalculation {
        let line_items = line_items(&profile);
        let summary = summarize(&profile, &line_items);
        let calculation = TaxCalculation::new(
            self.ids.next_id(),
            profile,
            line_items,
            self.clock.now(),
            summary,
        );

        debug!(
            id = %calculation.id,
            taxes = calculation.line_items.len(),
            total = %calculation.total_estimated,
            "estimate computed"
        );
        calculation
    }
}

impl Default for TaxEstimator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

impl std::fmt::Debug for TaxEstimator {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("TaxEstimator").finish_non_exhaustive()
    }
}

/// Applicable taxes for a profile, in display order.
pub fn line_items(profile: &ClientProfile) -> Vec<TaxLineItem> {
    let mut items = Vec::with_capacity(7);
    items.extend(irpj(profile));
    items.extend(csll(profile));
    items.extend(pis_cofins(profile).into_iter().flatten());
    items.extend(icms(profile));
    items.extend(iss(profile));
    items.extend(inss_employer(profile));

    for item in &items {
        debug!(
            tax = %item.name,
            rate = %item.rate,
            value = %item.estimated_value,
            "tax applies"
        );
    }
    items
}

/// One-sentence description naming the client, its revenue and the first
/// few taxes found.
pub fn summarize(
    profile: &ClientProfile,
    line_items: &[TaxLineItem],
) -> String {
    let names: Vec<&str> = line_items
        .iter()
        .take(SUMMARY_TAX_NAMES)
        .map(|item| item.name.as_str())
        .collect();
    let others = if line_items.len() > SUMMARY_TAX_NAMES {
        " and others"
    } else {
        ""
    };

    format!(
        "For {}, with revenue of R$ {}, the estimated taxes are: {}{}.",
        profile.name,
        format_brl(profile.annual_revenue),
        names.join(", "),
        others
    )
}

/// Profit base for regimes that tax a share of revenue.
fn profit_base(profile: &ClientProfile) -> Option<Decimal> {
    match profile.company_type {
        CompanyType::PresumedProfitCorp => {
            Some(profile.annual_revenue * rates::PRESUMED_PROFIT_BASE)
        }
        CompanyType::RealProfitCorp => Some(profile.annual_revenue * rates::REAL_PROFIT_MARGIN),
        CompanyType::Individual | CompanyType::SimplifiedCorp => None,
    }
}

fn irpj(profile: &ClientProfile) -> Option<TaxLineItem> {
    let (rate, value, observations) = match profile.company_type {
        CompanyType::Individual => return None,
        CompanyType::SimplifiedCorp => {
            let rate = rates::simples_irpj_rate(profile.annual_revenue);
            (
                rate,
                percent_of(profile.annual_revenue, rate),
                "Included in the unified DAS collection",
            )
        }
        CompanyType::PresumedProfitCorp | CompanyType::RealProfitCorp => {
            let base = profit_base(profile)?;
            (
                rates::IRPJ_RATE,
                percent_of(base, rates::IRPJ_RATE),
                "Quarterly or annual assessment",
            )
        }
    };

    Some(TaxLineItem {
        name: IRPJ.to_string(),
        rate,
        estimated_value: value,
        due_date: DueDate::On(profile.reference_date.year_end()),
        observations: observations.to_string(),
        category: TaxCategory::National,
    })
}

fn csll(profile: &ClientProfile) -> Option<TaxLineItem> {
    let base = profit_base(profile)?;

    Some(TaxLineItem {
        name: CSLL.to_string(),
        rate: rates::CSLL_RATE,
        estimated_value: percent_of(base, rates::CSLL_RATE),
        due_date: DueDate::On(profile.reference_date.year_end()),
        observations: "Social contribution on net profit".to_string(),
        category: TaxCategory::National,
    })
}

/// PIS and COFINS. Individuals are not excluded here; only Simples Nacional
/// companies are, since the unified collection already covers them.
fn pis_cofins(profile: &ClientProfile) -> Option<[TaxLineItem; 2]> {
    if profile.company_type == CompanyType::SimplifiedCorp {
        return None;
    }

    let cumulative = profile.company_type == CompanyType::PresumedProfitCorp;
    let (pis_rate, cofins_rate, regime) = if cumulative {
        (
            rates::PIS_CUMULATIVE_RATE,
            rates::COFINS_CUMULATIVE_RATE,
            "Cumulative regime",
        )
    } else {
        (
            rates::PIS_NON_CUMULATIVE_RATE,
            rates::COFINS_NON_CUMULATIVE_RATE,
            "Non-cumulative regime",
        )
    };

    let revenue_item = |name: &str, rate: Decimal| TaxLineItem {
        name: name.to_string(),
        rate,
        estimated_value: percent_of(profile.annual_revenue, rate),
        due_date: DueDate::Monthly,
        observations: regime.to_string(),
        category: TaxCategory::National,
    };

    Some([revenue_item(PIS, pis_rate), revenue_item(COFINS, cofins_rate)])
}

fn icms(profile: &ClientProfile) -> Option<TaxLineItem> {
    if !profile.sector.circulates_goods() {
        return None;
    }

    let state = profile.state.as_str();
    let rate = rates::icms_rate(state);

    Some(TaxLineItem {
        name: ICMS.to_string(),
        rate,
        estimated_value: percent_of(profile.annual_revenue, rate),
        due_date: DueDate::Monthly,
        observations: format!("Rate varies by state - {state}: {}%", format_rate(rate)),
        category: TaxCategory::State,
    })
}

fn iss(profile: &ClientProfile) -> Option<TaxLineItem> {
    if profile.sector != Sector::Services {
        return None;
    }

    Some(TaxLineItem {
        name: ISS.to_string(),
        rate: rates::ISS_RATE,
        estimated_value: percent_of(profile.annual_revenue, rates::ISS_RATE),
        due_date: DueDate::Monthly,
        observations: "Rate varies by municipality (2% to 5%)".to_string(),
        category: TaxCategory::Municipal,
    })
}

fn inss_employer(profile: &ClientProfile) -> Option<TaxLineItem> {
    if matches!(
        profile.company_type,
        CompanyType::Individual | CompanyType::SimplifiedCorp
    ) {
        return None;
    }

    let payroll = profile.annual_revenue * rates::ESTIMATED_PAYROLL_SHARE;

    Some(TaxLineItem {
        name: INSS_EMPLOYER.to_string(),
        rate: rates::INSS_EMPLOYER_RATE,
        estimated_value: percent_of(payroll, rates::INSS_EMPLOYER_RATE),
        due_date: DueDate::Monthly,
        observations: "On estimated payroll".to_string(),
        category: TaxCategory::National,
    })
}
