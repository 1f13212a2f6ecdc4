mod client_profile;
mod company_type;
mod reference_month;
mod sector;
mod state_code;
mod tax_calculation;
mod tax_line_item;

pub use client_profile::{
    ClientProfile, MAX_ANNUAL_REVENUE, MIN_NAME_LEN, NewClientProfile, ProfileError,
};
pub use company_type::CompanyType;
pub use reference_month::{ParseReferenceMonthError, ReferenceMonth};
pub use sector::Sector;
pub use state_code::StateCode;
pub use tax_calculation::TaxCalculation;
pub use tax_line_item::{DueDate, TaxCategory, TaxLineItem};
