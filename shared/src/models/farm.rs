//! Farm models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::{BrazilianState, Hectares};

/// A farm owned by a producer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: Uuid,
    pub producer_id: Uuid,
    #[validate(length(min = 1, message = "Farm name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: String,
    pub state: BrazilianState,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: String,
    /// Area in hectares
    pub total_area: Hectares,
    pub cultivated_area: Hectares,
    pub vegetation_area: Hectares,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Farm {
    pub(crate) fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.city = self.city.trim().to_string();
        self.address = self.address.trim().to_string();
    }
}

/// Input for creating a farm
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFarmInput {
    pub producer_id: Uuid,
    pub name: String,
    pub city: String,
    pub state: BrazilianState,
    pub address: String,
    pub total_area: Hectares,
    pub cultivated_area: Hectares,
    pub vegetation_area: Hectares,
}

/// Input for updating a farm
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFarm {
    /// Moves the farm to another producer
    pub producer_id: Option<Uuid>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<BrazilianState>,
    pub address: Option<String>,
    pub total_area: Option<Hectares>,
    pub cultivated_area: Option<Hectares>,
    pub vegetation_area: Option<Hectares>,
}

impl UpdateFarm {
    pub(crate) fn apply_to(self, farm: &mut Farm) {
        if let Some(producer_id) = self.producer_id {
            farm.producer_id = producer_id;
        }
        if let Some(name) = self.name {
            farm.name = name;
        }
        if let Some(city) = self.city {
            farm.city = city;
        }
        if let Some(state) = self.state {
            farm.state = state;
        }
        if let Some(address) = self.address {
            farm.address = address;
        }
        if let Some(total_area) = self.total_area {
            farm.total_area = total_area;
        }
        if let Some(cultivated_area) = self.cultivated_area {
            farm.cultivated_area = cultivated_area;
        }
        if let Some(vegetation_area) = self.vegetation_area {
            farm.vegetation_area = vegetation_area;
        }
    }
}
