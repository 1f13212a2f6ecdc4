use serde::{Deserialize, Serialize};

/// Tax regime a client is enrolled in. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyType {
    /// Pessoa Física.
    Individual,
    /// Simples Nacional.
    SimplifiedCorp,
    /// Lucro Presumido.
    PresumedProfitCorp,
    /// Lucro Real.
    RealProfitCorp,
}

impl CompanyType {
    pub fn all() -> &'static [CompanyType] {
        &[
            CompanyType::Individual,
            CompanyType::SimplifiedCorp,
            CompanyType::PresumedProfitCorp,
            CompanyType::RealProfitCorp,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "INDIVIDUAL",
            Self::SimplifiedCorp => "SIMPLIFIED_CORP",
            Self::PresumedProfitCorp => "PRESUMED_PROFIT_CORP",
            Self::RealProfitCorp => "REAL_PROFIT_CORP",
        }
    }

    /// Parses either the canonical code or the Brazilian short form
    /// (`PF`, `PJ_SIMPLES`, `PJ_PRESUMIDO`, `PJ_REAL`). Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INDIVIDUAL" | "PF" => Some(Self::Individual),
            "SIMPLIFIED_CORP" | "PJ_SIMPLES" => Some(Self::SimplifiedCorp),
            "PRESUMED_PROFIT_CORP" | "PJ_PRESUMIDO" => Some(Self::PresumedProfitCorp),
            "REAL_PROFIT_CORP" | "PJ_REAL" => Some(Self::RealProfitCorp),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Individual => "Individual (Pessoa Física)",
            Self::SimplifiedCorp => "Company - Simples Nacional",
            Self::PresumedProfitCorp => "Company - Lucro Presumido",
            Self::RealProfitCorp => "Company - Lucro Real",
        }
    }
}
