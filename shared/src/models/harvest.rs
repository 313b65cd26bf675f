//! Harvest models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::crop::Crop;

/// A growing season on one farm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase", from = "HarvestWire")]
pub struct Harvest {
    pub id: Uuid,
    pub farm_id: Uuid,
    #[validate(range(min = 1900, max = 2100, message = "Base year must be between 1900 and 2100"))]
    pub base_year: i32,
    /// e.g. "Safra 2024"
    #[validate(length(min = 1, message = "Harvest name cannot be empty"))]
    pub name: String,
    /// Linked catalog crops, in the order they were added
    #[serde(default)]
    pub crop_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Harvest as sent by the API layer: links come as `cropIds`, as embedded
/// `crops`, or both
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct HarvestWire {
    id: Uuid,
    farm_id: Uuid,
    base_year: i32,
    name: String,
    #[serde(default)]
    crop_ids: Vec<Uuid>,
    #[serde(default)]
    crops: Vec<Crop>,
    created_at: DateTime<Utc>,
}

impl From<HarvestWire> for Harvest {
    fn from(wire: HarvestWire) -> Self {
        // A crop named in both forms is one link; repeats inside a single
        // form are kept so admission reports them
        let mut crop_ids = wire.crop_ids.clone();
        for crop in wire.crops {
            if !wire.crop_ids.contains(&crop.id) {
                crop_ids.push(crop.id);
            }
        }
        Self {
            id: wire.id,
            farm_id: wire.farm_id,
            base_year: wire.base_year,
            name: wire.name,
            crop_ids,
            created_at: wire.created_at,
        }
    }
}

impl Harvest {
    pub fn has_crop(&self, crop_id: Uuid) -> bool {
        self.crop_ids.contains(&crop_id)
    }

    pub(crate) fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
    }
}

/// Input for opening a harvest on a farm
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateHarvestInput {
    pub farm_id: Uuid,
    pub base_year: i32,
    pub name: String,
}

/// Input for updating a harvest. Crop links change through the
/// association operations only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateHarvest {
    pub farm_id: Option<Uuid>,
    pub base_year: Option<i32>,
    pub name: Option<String>,
}

impl UpdateHarvest {
    pub(crate) fn apply_to(self, harvest: &mut Harvest) {
        if let Some(farm_id) = self.farm_id {
            harvest.farm_id = farm_id;
        }
        if let Some(base_year) = self.base_year {
            harvest.base_year = base_year;
        }
        if let Some(name) = self.name {
            harvest.name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARVEST_ID: &str = "3c9f6a52-1d0e-4b8a-9f3e-7a6b5c4d3e2f";
    const FARM_ID: &str = "0a9b8c7d-6e5f-4a3b-8c2d-1e0f9a8b7c6d";
    const SOY: &str = "5e4d3c2b-1a09-4f8e-9d7c-6b5a4f3e2d1c";
    const CORN: &str = "7f6e5d4c-3b2a-4190-8f7e-6d5c4b3a2f1e";

    fn harvest_json(links: &str) -> String {
        format!(
            r#"{{"id": "{}", "farmId": "{}", "baseYear": 2024, "name": "Safra 2024",
                "createdAt": "2024-03-01T00:00:00Z"{}}}"#,
            HARVEST_ID, FARM_ID, links
        )
    }

    #[test]
    fn test_embedded_crops_become_links() {
        let json = harvest_json(&format!(
            r#", "crops": [{{"id": "{}", "name": "Soja", "code": "SOJ"}},
                          {{"id": "{}", "name": "Milho", "code": "MIL"}}]"#,
            SOY, CORN
        ));
        let harvest: Harvest = serde_json::from_str(&json).unwrap();

        let expected: Vec<Uuid> = vec![SOY.parse().unwrap(), CORN.parse().unwrap()];
        assert_eq!(harvest.crop_ids, expected);
    }

    #[test]
    fn test_crop_ids_and_embedded_crops_merge() {
        let json = harvest_json(&format!(
            r#", "cropIds": ["{}"], "crops": [{{"id": "{}", "name": "Soja", "code": "SOJ"}},
                                              {{"id": "{}", "name": "Milho", "code": "MIL"}}]"#,
            SOY, SOY, CORN
        ));
        let harvest: Harvest = serde_json::from_str(&json).unwrap();

        let expected: Vec<Uuid> = vec![SOY.parse().unwrap(), CORN.parse().unwrap()];
        assert_eq!(harvest.crop_ids, expected);
    }

    #[test]
    fn test_unknown_harvest_fields_rejected() {
        let json = harvest_json(r#", "cultures": []"#);
        assert!(serde_json::from_str::<Harvest>(&json).is_err());
    }

    #[test]
    fn test_serialized_harvest_reads_back() {
        let harvest: Harvest =
            serde_json::from_str(&harvest_json(&format!(r#", "cropIds": ["{}"]"#, SOY))).unwrap();
        let json = serde_json::to_string(&harvest).unwrap();
        assert_eq!(serde_json::from_str::<Harvest>(&json).unwrap(), harvest);
    }
}
