//! Producer models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::DocumentType;
use crate::validation::{document_type, normalize_document, validate_document_field};

/// A rural producer, identified by CPF or CNPJ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    pub id: Uuid,
    /// Digits only, 11 (CPF) or 14 (CNPJ)
    #[validate(custom = "validate_document_field")]
    pub document: String,
    #[validate(length(min = 1, message = "Producer name cannot be empty"))]
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Producer {
    pub fn document_type(&self) -> Option<DocumentType> {
        document_type(&self.document)
    }

    /// Trim the name and strip document punctuation
    pub(crate) fn normalize(&mut self) {
        self.document = normalize_document(&self.document);
        self.name = self.name.trim().to_string();
    }
}

/// Input for registering a new producer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProducerInput {
    /// CPF or CNPJ, punctuation allowed
    pub document: String,
    pub name: String,
}

/// Fields of a producer that can change after registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProducer {
    pub document: Option<String>,
    pub name: Option<String>,
}

impl UpdateProducer {
    pub(crate) fn apply_to(self, producer: &mut Producer) {
        if let Some(document) = self.document {
            producer.document = document;
        }
        if let Some(name) = self.name {
            producer.name = name;
        }
    }
}
