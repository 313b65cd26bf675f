//! Taxpayer document property-based and unit tests
//!
//! Comprehensive tests for:
//! - Property 1: Generated CPFs with correct check digits validate
//! - Property 2: Generated CNPJs with correct check digits validate
//! - Property 3: Repeated-digit documents are always rejected
//! - Property 4: Formatting only inserts separators

use proptest::prelude::*;
use shared::{document_type, format_document, is_valid_document, normalize_document, DocumentType};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate the 9 base digits of a CPF, not all identical
fn cpf_base_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0..=9u32, 9)
        .prop_filter("must not repeat one digit", |d| d.iter().any(|x| *x != d[0]))
}

/// Generate the 12 base digits of a CNPJ, not all identical
fn cnpj_base_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0..=9u32, 12)
        .prop_filter("must not repeat one digit", |d| d.iter().any(|x| *x != d[0]))
}

proptest! {
    /// Property 1: any CPF completed with its check digits is valid
    #[test]
    fn test_generated_cpf_is_valid(base in cpf_base_strategy()) {
        let cpf = complete_cpf(&base);
        prop_assert_eq!(document_type(&cpf), Some(DocumentType::Cpf));
        prop_assert!(is_valid_document(&cpf), "CPF {} should validate", cpf);
    }

    /// Property 1: a wrong last digit is always rejected
    #[test]
    fn test_tampered_cpf_is_invalid(base in cpf_base_strategy(), bump in 1..=9u32) {
        let cpf = complete_cpf(&base);
        let last = cpf.chars().last().and_then(|c| c.to_digit(10)).unwrap();
        let tampered = format!("{}{}", &cpf[..10], (last + bump) % 10);
        prop_assert!(!is_valid_document(&tampered));
    }

    /// Property 2: any CNPJ completed with its check digits is valid
    #[test]
    fn test_generated_cnpj_is_valid(base in cnpj_base_strategy()) {
        let cnpj = complete_cnpj(&base);
        prop_assert_eq!(document_type(&cnpj), Some(DocumentType::Cnpj));
        prop_assert!(is_valid_document(&cnpj), "CNPJ {} should validate", cnpj);
    }

    /// Property 3: repeated digits never validate
    #[test]
    fn test_repeated_digits_rejected(digit in 0..=9u32, cnpj in any::<bool>()) {
        let len = if cnpj { 14 } else { 11 };
        let doc: String = std::iter::repeat(char::from_digit(digit, 10).unwrap())
            .take(len)
            .collect();
        prop_assert!(!is_valid_document(&doc));
    }

    /// Property 4: stripping the separators gives back the input
    #[test]
    fn test_format_preserves_digits(digits in "[0-9]{0,16}") {
        let formatted = format_document(&digits);
        prop_assert_eq!(normalize_document(&formatted), digits.clone());
        if digits.len() != 11 && digits.len() != 14 {
            prop_assert_eq!(formatted, digits);
        }
    }

    /// Lengths other than 11 and 14 are never classified or valid
    #[test]
    fn test_other_lengths_unclassified(digits in "[0-9]{0,20}") {
        prop_assume!(digits.len() != 11 && digits.len() != 14);
        prop_assert_eq!(document_type(&digits), None);
        prop_assert!(!is_valid_document(&digits));
    }
}

// ============================================================================
// Helper Functions (mirroring the check digit rules)
// ============================================================================

fn mod11_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

fn to_string(digits: &[u32]) -> String {
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}

fn complete_cpf(base: &[u32]) -> String {
    let mut digits = base.to_vec();
    let first = mod11_digit(&digits, &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits.push(first);
    let second = mod11_digit(&digits, &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits.push(second);
    to_string(&digits)
}

fn complete_cnpj(base: &[u32]) -> String {
    let mut digits = base.to_vec();
    let first = mod11_digit(&digits, &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits.push(first);
    let second = mod11_digit(&digits, &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits.push(second);
    to_string(&digits)
}

// ============================================================================
// Unit Tests: Known Documents
// ============================================================================

#[cfg(test)]
mod known_document_tests {
    use super::*;

    #[test]
    fn test_reference_cpf() {
        assert!(is_valid_document("52998224725"));
        assert!(!is_valid_document("11111111111"));
        assert_eq!(format_document("52998224725"), "529.982.247-25");
    }

    #[test]
    fn test_reference_cnpj() {
        assert!(is_valid_document("11222333000181"));
        assert!(!is_valid_document("11111111111111"));
        assert_eq!(format_document("11222333000181"), "11.222.333/0001-81");
    }

    #[test]
    fn test_helpers_agree_with_reference_documents() {
        assert_eq!(complete_cpf(&[5, 2, 9, 9, 8, 2, 2, 4, 7]), "52998224725");
        assert_eq!(
            complete_cnpj(&[1, 1, 2, 2, 2, 3, 3, 3, 0, 0, 0, 1]),
            "11222333000181"
        );
    }

    #[test]
    fn test_progressive_formatting_while_typing() {
        for partial in ["5", "529", "5299822", "5299822472", "529982247251"] {
            assert_eq!(format_document(partial), partial);
        }
    }
}
