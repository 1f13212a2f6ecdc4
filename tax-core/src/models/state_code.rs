use serde::{Deserialize, Serialize};

/// Brazilian federated units (26 states plus the Federal District).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateCode {
    AC,
    AL,
    AP,
    AM,
    BA,
    CE,
    DF,
    ES,
    GO,
    MA,
    MT,
    MS,
    MG,
    PA,
    PB,
    PR,
    PE,
    PI,
    RJ,
    RN,
    RS,
    RO,
    RR,
    SC,
    SP,
    SE,
    TO,
}

impl StateCode {
    pub fn all() -> &'static [StateCode] {
        use StateCode::*;
        &[
            AC, AL, AP, AM, BA, CE, DF, ES, GO, MA, MT, MS, MG, PA, PB, PR, PE, PI, RJ, RN, RS, RO,
            RR, SC, SP, SE, TO,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AC => "AC",
            Self::AL => "AL",
            Self::AP => "AP",
            Self::AM => "AM",
            Self::BA => "BA",
            Self::CE => "CE",
            Self::DF => "DF",
            Self::ES => "ES",
            Self::GO => "GO",
            Self::MA => "MA",
            Self::MT => "MT",
            Self::MS => "MS",
            Self::MG => "MG",
            Self::PA => "PA",
            Self::PB => "PB",
            Self::PR => "PR",
            Self::PE => "PE",
            Self::PI => "PI",
            Self::RJ => "RJ",
            Self::RN => "RN",
            Self::RS => "RS",
            Self::RO => "RO",
            Self::RR => "RR",
            Self::SC => "SC",
            Self::SP => "SP",
            Self::SE => "SE",
            Self::TO => "TO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_uppercase();
        Self::all().iter().copied().find(|state| state.as_str() == code)
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn there_are_twenty_seven_federated_units() {
        assert_eq!(StateCode::all().len(), 27);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(StateCode::parse("sp"), Some(StateCode::SP));
        assert_eq!(StateCode::parse(" rj "), Some(StateCode::RJ));
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(StateCode::parse("XX"), None);
        assert_eq!(StateCode::parse("S"), None);
    }

    #[test]
    fn as_str_round_trips_every_code() {
        for state in StateCode::all() {
            assert_eq!(StateCode::parse(state.as_str()), Some(*state));
        }
    }
}
