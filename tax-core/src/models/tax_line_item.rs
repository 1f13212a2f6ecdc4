use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Government sphere that levies a tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxCategory {
    National,
    State,
    Municipal,
}

impl TaxCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::National => "National",
            Self::State => "State",
            Self::Municipal => "Municipal",
        }
    }
}

/// When a tax is due: a fixed date or a recurring monthly collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DueDate {
    On(NaiveDate),
    Monthly,
}

impl fmt::Display for DueDate {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::On(date) => write!(f, "{}", date.format("%d/%m/%Y")),
            Self::Monthly => f.write_str("Monthly"),
        }
    }
}

/// One applicable tax in an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLineItem {
    pub name: String,
    /// Percentage, e.g. `15` for 15 %.
    pub rate: Decimal,
    pub estimated_value: Decimal,
    pub due_date: DueDate,
    pub observations: String,
    pub category: TaxCategory,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn due_date_displays_brazilian_date() {
        let due = DueDate::On(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        assert_eq!(due.to_string(), "31/12/2025");
    }

    #[test]
    fn due_date_displays_cadence() {
        assert_eq!(DueDate::Monthly.to_string(), "Monthly");
    }
}
