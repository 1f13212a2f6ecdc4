use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Trade,
    Services,
    Industry,
    Agribusiness,
}

impl Sector {
    pub fn all() -> &'static [Sector] {
        &[
            Sector::Trade,
            Sector::Services,
            Sector::Industry,
            Sector::Agribusiness,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trade => "TRADE",
            Self::Services => "SERVICES",
            Self::Industry => "INDUSTRY",
            Self::Agribusiness => "AGRIBUSINESS",
        }
    }

    /// Parses the canonical code or the Portuguese one
    /// (`COMERCIO`, `SERVICOS`, `INDUSTRIA`, `AGRONEGOCIO`). Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRADE" | "COMERCIO" => Some(Self::Trade),
            "SERVICES" | "SERVICOS" => Some(Self::Services),
            "INDUSTRY" | "INDUSTRIA" => Some(Self::Industry),
            "AGRIBUSINESS" | "AGRONEGOCIO" => Some(Self::Agribusiness),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Trade => "Trade",
            Self::Services => "Services",
            Self::Industry => "Industry",
            Self::Agribusiness => "Agribusiness",
        }
    }

    /// Sectors that move goods and therefore pay ICMS.
    pub fn circulates_goods(&self) -> bool {
        matches!(self, Self::Trade | Self::Industry)
    }
}
