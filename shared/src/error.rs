//! Error handling for the Farm Admin core
//!
//! Every rejected store mutation is reported as a `DomainError`; the store is
//! left exactly as it was before the call.

use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Domain error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Checksum, area or field-shape rule violated
    #[error("Validation failed on {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Crop {crop_id} is already linked to harvest {harvest_id}")]
    DuplicateAssociation { harvest_id: Uuid, crop_id: Uuid },

    /// Only raised while admitting a remote snapshot
    #[error("Duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: Uuid },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        DomainError::NotFound { entity, id }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ValidationFailed { .. } => "VALIDATION_FAILED",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::DuplicateAssociation { .. } => "DUPLICATE_ASSOCIATION",
            DomainError::DuplicateId { .. } => "DUPLICATE_ID",
        }
    }
}

impl From<ValidationErrors> for DomainError {
    /// Reports the alphabetically first failing field
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_else(|| "invalid value".to_string());
                DomainError::validation(*field, message)
            }
            None => DomainError::validation("input", "invalid input"),
        }
    }
}

/// Result type alias for store operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_error_codes() {
        let id = Uuid::new_v4();
        assert_eq!(DomainError::validation("name", "empty").code(), "VALIDATION_FAILED");
        assert_eq!(DomainError::not_found("Farm", id).code(), "NOT_FOUND");
        assert_eq!(
            DomainError::DuplicateAssociation {
                harvest_id: id,
                crop_id: id
            }
            .code(),
            "DUPLICATE_ASSOCIATION"
        );
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = DomainError::not_found("Producer", id);
        assert_eq!(
            err.to_string(),
            "Producer 00000000-0000-0000-0000-000000000000 not found"
        );
    }

    #[test]
    fn test_from_validation_errors_picks_first_field() {
        let mut errors = ValidationErrors::new();
        let mut name_error = ValidationError::new("length");
        name_error.message = Some("Name cannot be empty".into());
        errors.add("name", name_error);
        errors.add("city", ValidationError::new("length"));

        let err = DomainError::from(errors);
        assert_eq!(err, DomainError::validation("city", "length"));
    }
}
