//! Validation utilities for the Farm Admin core
//!
//! Includes Brazil-specific taxpayer document checks (CPF/CNPJ) and the
//! land-use decomposition rule every farm has to satisfy.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::types::{DocumentType, Hectares};

// ============================================================================
// Taxpayer Document Validations
// ============================================================================

/// CNPJ weights for the first check digit
const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// CNPJ weights for the second check digit
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Strip every non-digit character from a document as typed by the user
/// Accepts: 529.982.247-25, 11.222.333/0001-81, raw digits
pub fn normalize_document(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Classify a digits-only document by length. Does not check the checksum.
pub fn document_type(raw: &str) -> Option<DocumentType> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.len() {
        11 => Some(DocumentType::Cpf),
        14 => Some(DocumentType::Cnpj),
        _ => None,
    }
}

/// Modulo 11 check digit: remainder below 2 maps to 0, otherwise 11 - remainder
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// Validate a Brazilian CPF (Cadastro de Pessoas Físicas) or CNPJ
/// (Cadastro Nacional da Pessoa Jurídica) given as digits only
pub fn is_valid_document(raw: &str) -> bool {
    let Some(kind) = document_type(raw) else {
        return false;
    };

    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();

    // Repeated digits pass the checksum but are never issued
    if digits.windows(2).all(|pair| pair[0] == pair[1]) {
        return false;
    }

    let (first, second) = match kind {
        DocumentType::Cpf => {
            let first_weights: Vec<u32> = (2..=10).rev().collect();
            let second_weights: Vec<u32> = (2..=11).rev().collect();
            let first = check_digit(&digits[..9], &first_weights);
            let mut with_first = digits[..9].to_vec();
            with_first.push(first);
            (first, check_digit(&with_first, &second_weights))
        }
        DocumentType::Cnpj => {
            let first = check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS);
            let mut with_first = digits[..12].to_vec();
            with_first.push(first);
            (first, check_digit(&with_first, &CNPJ_SECOND_WEIGHTS))
        }
    };

    let len = digits.len();
    first == digits[len - 2] && second == digits[len - 1]
}

/// Insert display separators into a digits-only document
/// Format: XXX.XXX.XXX-XX (CPF), XX.XXX.XXX/XXXX-XX (CNPJ).
/// Anything else is returned as-is so partially typed input still renders.
pub fn format_document(raw: &str) -> String {
    match document_type(raw) {
        Some(DocumentType::Cpf) => format!(
            "{}.{}.{}-{}",
            &raw[0..3],
            &raw[3..6],
            &raw[6..9],
            &raw[9..11]
        ),
        Some(DocumentType::Cnpj) => format!(
            "{}.{}.{}/{}-{}",
            &raw[0..2],
            &raw[2..5],
            &raw[5..8],
            &raw[8..12],
            &raw[12..14]
        ),
        None => raw.to_string(),
    }
}

/// Field validator for derived `Validate` impls on documents
pub fn validate_document_field(document: &str) -> Result<(), ValidationError> {
    if is_valid_document(document) {
        return Ok(());
    }
    let mut error = ValidationError::new("document");
    error.message = Some(match document_type(document) {
        Some(kind) => format!("Invalid {} checksum", kind).into(),
        None => "Document must have 11 (CPF) or 14 (CNPJ) digits".into(),
    });
    Err(error)
}

// ============================================================================
// Land Use Validations
// ============================================================================

/// Validate that cultivated and vegetation areas fit inside the total area.
/// Does not require a positive total; farm admission checks that separately.
pub fn validate_area_constraints(
    total: Hectares,
    cultivated: Hectares,
    vegetation: Hectares,
) -> bool {
    if total < Decimal::ZERO || cultivated < Decimal::ZERO || vegetation < Decimal::ZERO {
        return false;
    }
    // A sum past Decimal::MAX cannot fit in any total
    cultivated
        .checked_add(vegetation)
        .is_some_and(|used| used <= total)
}

/// Hectares still unassigned after cultivated and vegetation areas.
/// Negative when the decomposition is invalid, `None` when the result does
/// not fit in a `Decimal`.
pub fn remaining_area(
    total: Hectares,
    cultivated: Hectares,
    vegetation: Hectares,
) -> Option<Hectares> {
    cultivated
        .checked_add(vegetation)
        .and_then(|used| total.checked_sub(used))
}
