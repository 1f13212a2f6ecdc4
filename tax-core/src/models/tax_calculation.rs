use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ClientProfile, TaxLineItem};

/// The result of one estimation run. Never mutated after creation.
///
/// `total_estimated` is always the sum of the line item values. It is
/// computed on construction and recomputed on deserialization, so a stored
/// total that drifted from its line items is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredCalculation")]
pub struct TaxCalculation {
    pub id: String,
    pub client: ClientProfile,
    pub line_items: Vec<TaxLineItem>,
    pub total_estimated: Decimal,
    pub calculated_at: DateTime<Utc>,
    pub summary: String,
}

impl TaxCalculation {
    pub fn new(
        id: String,
        client: ClientProfile,
        line_items: Vec<TaxLineItem>,
        calculated_at: DateTime<Utc>,
        summary: String,
    ) -> Self {
        let total_estimated = sum_values(&line_items);
        Self {
            id,
            client,
            line_items,
            total_estimated,
            calculated_at,
            summary,
        }
    }

    /// Names of the first `n` line items, in estimation order.
    pub fn leading_tax_names(
        &self,
        n: usize,
    ) -> Vec<&str> {
        self.line_items
            .iter()
            .take(n)
            .map(|item| item.name.as_str())
            .collect()
    }
}

fn sum_values(line_items: &[TaxLineItem]) -> Decimal {
    line_items.iter().map(|item| item.estimated_value).sum()
}

/// On-disk shape of a calculation. The stored total is read but ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCalculation {
    id: String,
    client: ClientProfile,
    line_items: Vec<TaxLineItem>,
    #[serde(default)]
    #[allow(dead_code)]
    total_estimated: Option<Decimal>,
    calculated_at: DateTime<Utc>,
    summary: String,
}

impl From<StoredCalculation> for TaxCalculation {
    fn from(stored: StoredCalculation) -> Self {
        TaxCalculation::new(
            stored.id,
            stored.client,
            stored.line_items,
            stored.calculated_at,
            stored.summary,
        )
    }
}
