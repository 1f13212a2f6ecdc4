use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CompanyType, ReferenceMonth, Sector, StateCode};

/// Minimum number of characters in a client name.
pub const MIN_NAME_LEN: usize = 2;

/// Largest accepted annual revenue, in reais. Keeps every rate product well
/// inside `Decimal` range.
pub const MAX_ANNUAL_REVENUE: Decimal = dec!(1000000000000000);

/// A field-level problem found while validating a [`NewClientProfile`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("name must have at least {MIN_NAME_LEN} characters")]
    NameTooShort,

    #[error("annual revenue must not be negative (got {0})")]
    NegativeRevenue(Decimal),

    #[error("annual revenue must not exceed {MAX_ANNUAL_REVENUE} (got {0})")]
    RevenueTooLarge(Decimal),
}

/// A client as submitted for estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: String,
    pub name: String,
    pub company_type: CompanyType,
    pub annual_revenue: Decimal,
    pub state: StateCode,
    pub sector: Sector,
    pub reference_date: ReferenceMonth,
    pub created_at: DateTime<Utc>,
}

/// For creating new profiles (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClientProfile {
    pub name: String,
    pub company_type: CompanyType,
    pub annual_revenue: Decimal,
    pub state: StateCode,
    pub sector: Sector,
    pub reference_date: ReferenceMonth,
}

impl NewClientProfile {
    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<(), Vec<ProfileError>> {
        let mut errors = Vec::new();

        if self.name.trim().chars().count() < MIN_NAME_LEN {
            errors.push(ProfileError::NameTooShort);
        }
        if self.annual_revenue < Decimal::ZERO {
            errors.push(ProfileError::NegativeRevenue(self.annual_revenue));
        }
        if self.annual_revenue > MAX_ANNUAL_REVENUE {
            errors.push(ProfileError::RevenueTooLarge(self.annual_revenue));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates and assigns identity. The name is stored trimmed.
    pub fn into_profile(
        self,
        id: String,
        created_at: DateTime<Utc>,
    ) -> Result<ClientProfile, Vec<ProfileError>> {
        self.validate()?;

        Ok(ClientProfile {
            id,
            name: self.name.trim().to_string(),
            company_type: self.company_type,
            annual_revenue: self.annual_revenue,
            state: self.state,
            sector: self.sector,
            reference_date: self.reference_date,
            created_at,
        })
    }
}
