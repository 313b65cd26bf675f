//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Area measured in hectares
pub type Hectares = rust_decimal::Decimal;

/// Brazilian taxpayer document kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    /// Individual taxpayer, 11 digits
    Cpf,
    /// Company taxpayer, 14 digits
    Cnpj,
}

impl DocumentType {
    /// Number of digits a document of this kind carries
    pub fn digit_count(&self) -> usize {
        match self {
            DocumentType::Cpf => 11,
            DocumentType::Cnpj => 14,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Cpf => write!(f, "CPF"),
            DocumentType::Cnpj => write!(f, "CNPJ"),
        }
    }
}

/// The 26 Brazilian states plus the Federal District
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum BrazilianState {
    Ac,
    Al,
    Ap,
    Am,
    Ba,
    Ce,
    Df,
    Es,
    Go,
    Ma,
    Mt,
    Ms,
    Mg,
    Pa,
    Pb,
    Pr,
    Pe,
    Pi,
    Rj,
    Rn,
    Rs,
    Ro,
    Rr,
    Sc,
    Sp,
    Se,
    To,
}

impl BrazilianState {
    /// Every region code, in the order the farm form lists them
    pub const ALL: [BrazilianState; 27] = [
        BrazilianState::Ac,
        BrazilianState::Al,
        BrazilianState::Ap,
        BrazilianState::Am,
        BrazilianState::Ba,
        BrazilianState::Ce,
        BrazilianState::Df,
        BrazilianState::Es,
        BrazilianState::Go,
        BrazilianState::Ma,
        BrazilianState::Mt,
        BrazilianState::Ms,
        BrazilianState::Mg,
        BrazilianState::Pa,
        BrazilianState::Pb,
        BrazilianState::Pr,
        BrazilianState::Pe,
        BrazilianState::Pi,
        BrazilianState::Rj,
        BrazilianState::Rn,
        BrazilianState::Rs,
        BrazilianState::Ro,
        BrazilianState::Rr,
        BrazilianState::Sc,
        BrazilianState::Sp,
        BrazilianState::Se,
        BrazilianState::To,
    ];

    /// Two-letter uppercase code
    pub fn code(&self) -> &'static str {
        match self {
            BrazilianState::Ac => "AC",
            BrazilianState::Al => "AL",
            BrazilianState::Ap => "AP",
            BrazilianState::Am => "AM",
            BrazilianState::Ba => "BA",
            BrazilianState::Ce => "CE",
            BrazilianState::Df => "DF",
            BrazilianState::Es => "ES",
            BrazilianState::Go => "GO",
            BrazilianState::Ma => "MA",
            BrazilianState::Mt => "MT",
            BrazilianState::Ms => "MS",
            BrazilianState::Mg => "MG",
            BrazilianState::Pa => "PA",
            BrazilianState::Pb => "PB",
            BrazilianState::Pr => "PR",
            BrazilianState::Pe => "PE",
            BrazilianState::Pi => "PI",
            BrazilianState::Rj => "RJ",
            BrazilianState::Rn => "RN",
            BrazilianState::Rs => "RS",
            BrazilianState::Ro => "RO",
            BrazilianState::Rr => "RR",
            BrazilianState::Sc => "SC",
            BrazilianState::Sp => "SP",
            BrazilianState::Se => "SE",
            BrazilianState::To => "TO",
        }
    }
}

impl fmt::Display for BrazilianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BrazilianState {
    type Err = &'static str;

    /// Case-insensitive lookup by two-letter code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        BrazilianState::ALL
            .iter()
            .copied()
            .find(|state| state.code() == code)
            .ok_or("Unknown Brazilian state code")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes_are_unique() {
        let mut codes: Vec<&str> = BrazilianState::ALL.iter().map(|s| s.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 27);
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!("SP".parse::<BrazilianState>(), Ok(BrazilianState::Sp));
        assert_eq!(" mg ".parse::<BrazilianState>(), Ok(BrazilianState::Mg));
        assert!("XX".parse::<BrazilianState>().is_err());
    }

    #[test]
    fn test_state_serializes_as_code() {
        let json = serde_json::to_string(&BrazilianState::Df).unwrap();
        assert_eq!(json, "\"DF\"");
        let state: BrazilianState = serde_json::from_str("\"TO\"").unwrap();
        assert_eq!(state, BrazilianState::To);
    }

    #[test]
    fn test_document_type_labels() {
        assert_eq!(DocumentType::Cpf.to_string(), "CPF");
        assert_eq!(DocumentType::Cnpj.to_string(), "CNPJ");
        assert_eq!(serde_json::to_string(&DocumentType::Cnpj).unwrap(), "\"CNPJ\"");
        assert_eq!(DocumentType::Cnpj.digit_count(), 14);
    }
}
