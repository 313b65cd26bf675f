//! Crop catalog models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A catalog crop (species or variety) shared by every harvest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: Uuid,
    #[validate(length(min = 1, message = "Crop name cannot be empty"))]
    pub name: String,
    /// Short catalog code, e.g. "SOJ"
    #[validate(length(min = 1, message = "Crop code cannot be empty"))]
    pub code: String,
}

impl Crop {
    pub(crate) fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.code = self.code.trim().to_string();
    }
}

/// Input for adding a crop to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCropInput {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCrop {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl UpdateCrop {
    pub(crate) fn apply_to(self, crop: &mut Crop) {
        if let Some(name) = self.name {
            crop.name = name;
        }
        if let Some(code) = self.code {
            crop.code = code;
        }
    }
}
