use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    AppState, CompanyType, NewClientProfile, ProfileError, ReferenceMonth, Sector, StateCode,
    StateError,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when importing client profiles.
///
/// `row` is the 1-based position of the record below the header line.
#[derive(Debug, Error)]
pub enum ClientProfileLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("row {row}: unknown company type '{value}'")]
    InvalidCompanyType { row: usize, value: String },

    #[error("row {row}: unknown sector '{value}'")]
    InvalidSector { row: usize, value: String },

    #[error("row {row}: unknown state '{value}'")]
    InvalidState { row: usize, value: String },

    #[error("row {row}: reference month '{value}' is not in YYYY-MM form")]
    InvalidReferenceMonth { row: usize, value: String },

    #[error("row {row}: {}", join_errors(.errors))]
    Validation { row: usize, errors: Vec<ProfileError> },

    #[error("Could not record calculation: {0}")]
    State(#[from] StateError),
}

impl From<csv::Error> for ClientProfileLoaderError {
    fn from(err: csv::Error) -> Self {
        ClientProfileLoaderError::CsvParse(err.to_string())
    }
}

fn join_errors(errors: &[ProfileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single record from the client profiles CSV file.
///
/// Columns:
/// - `name`: client or company name
/// - `company_type`: `INDIVIDUAL`, `SIMPLIFIED_CORP`, `PRESUMED_PROFIT_CORP`,
///   `REAL_PROFIT_CORP` (or the `PF`/`PJ_*` short forms)
/// - `annual_revenue`: gross annual revenue in reais
/// - `state`: two-letter state code
/// - `sector`: `TRADE`, `SERVICES`, `INDUSTRY`, `AGRIBUSINESS`
/// - `reference_month`: `YYYY-MM`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientProfileRecord {
    pub name: String,
    pub company_type: String,
    pub annual_revenue: Decimal,
    pub state: String,
    pub sector: String,
    pub reference_month: String,
}

impl ClientProfileRecord {
    /// Converts the raw columns into a validated profile input.
    pub fn to_new_profile(
        &self,
        row: usize,
    ) -> Result<NewClientProfile, ClientProfileLoaderError> {
        let company_type = CompanyType::parse(&self.company_type).ok_or_else(|| {
            ClientProfileLoaderError::InvalidCompanyType {
                row,
                value: self.company_type.clone(),
            }
        })?;
        let state = StateCode::parse(&self.state).ok_or_else(|| {
            ClientProfileLoaderError::InvalidState {
                row,
                value: self.state.clone(),
            }
        })?;
        let sector =
            Sector::parse(&self.sector).ok_or_else(|| ClientProfileLoaderError::InvalidSector {
                row,
                value: self.sector.clone(),
            })?;
        let reference_date = self
            .reference_month
            .trim()
            .parse::<ReferenceMonth>()
            .map_err(|_| ClientProfileLoaderError::InvalidReferenceMonth {
                row,
                value: self.reference_month.clone(),
            })?;

        let profile = NewClientProfile {
            name: self.name.clone(),
            company_type,
            annual_revenue: self.annual_revenue,
            state,
            sector,
            reference_date,
        };
        profile
            .validate()
            .map_err(|errors| ClientProfileLoaderError::Validation { row, errors })?;
        Ok(profile)
    }
}

/// Batch import of client profiles from CSV files.
///
/// Every record is estimated and appended to the calculation history of an
/// [`AppState`], so the import works with whichever storage backend the
/// state was opened on.
pub struct ClientProfileLoader;

impl ClientProfileLoader {
    /// Parse client profile records from a CSV reader, in file order.
    ///
    /// Headers are matched by name and surrounding whitespace is trimmed.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ClientProfileRecord>, ClientProfileLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ClientProfileRecord = result?;
            records.push(record);
        }

        debug!(records = records.len(), "client profiles parsed");
        Ok(records)
    }

    /// Estimate every record and record it in `state`.
    ///
    /// All records are converted before anything is written, so a bad row
    /// leaves the history untouched. Returns the number of calculations
    /// recorded. The last record ends up as the current calculation.
    pub async fn load(
        state: &mut AppState,
        records: &[ClientProfileRecord],
    ) -> Result<usize, ClientProfileLoaderError> {
        let profiles = records
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_new_profile(index + 1))
            .collect::<Result<Vec<_>, _>>()?;

        let mut recorded = 0;
        for profile in profiles {
            state.calculate(profile).await?;
            recorded += 1;
        }

        info!(recorded, "client profiles imported");
        Ok(recorded)
    }
}
