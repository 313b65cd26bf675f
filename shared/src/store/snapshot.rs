//! Whole-store snapshots exchanged with the external API layer

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::arena::insert_ordered;
use super::{check_farm, CropRecord, DomainStore, FarmRecord, ProducerRecord, CROP, FARM, HARVEST, PRODUCER};
use crate::error::{DomainError, DomainResult};
use crate::models::{Crop, Farm, Harvest, Producer};

/// Every entity of a store, as fetched from or sent to the remote API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub producers: Vec<Producer>,
    #[serde(default)]
    pub farms: Vec<Farm>,
    #[serde(default)]
    pub harvests: Vec<Harvest>,
    #[serde(default)]
    pub crops: Vec<Crop>,
}

impl DomainStore {
    /// Build a store from a remote snapshot, all or nothing.
    ///
    /// Entities pass the same gates as the add operations, ids must be
    /// unique per kind and every back-reference must resolve. Entity order
    /// inside each list becomes the store's insertion order.
    pub fn from_snapshot(snapshot: Snapshot) -> DomainResult<Self> {
        let counts = (
            snapshot.producers.len(),
            snapshot.farms.len(),
            snapshot.harvests.len(),
            snapshot.crops.len(),
        );
        match Self::admit(snapshot) {
            Ok(store) => {
                tracing::info!(
                    producers = counts.0,
                    farms = counts.1,
                    harvests = counts.2,
                    crops = counts.3,
                    "Snapshot admitted"
                );
                Ok(store)
            }
            Err(error) => {
                tracing::warn!(code = error.code(), "Snapshot rejected: {}", error);
                Err(error)
            }
        }
    }

    /// Replace the whole state with a snapshot. On error the current state
    /// is kept.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> DomainResult<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    /// Export every entity in insertion order
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            producers: self.producers(),
            farms: self.farms(),
            harvests: self.harvests(),
            crops: self.crops(),
        }
    }

    fn admit(snapshot: Snapshot) -> DomainResult<Self> {
        let mut store = DomainStore::new();

        for mut crop in snapshot.crops {
            if store.crops.contains(crop.id) {
                return Err(DomainError::DuplicateId { entity: CROP, id: crop.id });
            }
            crop.normalize();
            crop.validate()?;
            store.crops.insert(
                crop.id,
                CropRecord {
                    crop,
                    harvests: Vec::new(),
                },
            );
        }

        for mut producer in snapshot.producers {
            if store.producers.contains(producer.id) {
                return Err(DomainError::DuplicateId {
                    entity: PRODUCER,
                    id: producer.id,
                });
            }
            producer.normalize();
            producer.validate()?;
            store.producers.insert(
                producer.id,
                ProducerRecord {
                    producer,
                    farms: Vec::new(),
                },
            );
        }

        for mut farm in snapshot.farms {
            if store.farms.contains(farm.id) {
                return Err(DomainError::DuplicateId { entity: FARM, id: farm.id });
            }
            let owner = store
                .producers
                .handle(farm.producer_id)
                .ok_or_else(|| DomainError::not_found(PRODUCER, farm.producer_id))?;
            farm.normalize();
            check_farm(&farm)?;

            let handle = store.farms.insert(
                farm.id,
                FarmRecord {
                    farm,
                    harvests: Vec::new(),
                },
            );
            if let Some(record) = store.producers.get_mut(owner) {
                insert_ordered(&mut record.farms, handle);
            }
        }

        for mut harvest in snapshot.harvests {
            if store.harvests.contains(harvest.id) {
                return Err(DomainError::DuplicateId {
                    entity: HARVEST,
                    id: harvest.id,
                });
            }
            let farm = store
                .farms
                .handle(harvest.farm_id)
                .ok_or_else(|| DomainError::not_found(FARM, harvest.farm_id))?;
            harvest.normalize();
            harvest.validate()?;
            for (position, crop_id) in harvest.crop_ids.iter().enumerate() {
                if !store.crops.contains(*crop_id) {
                    return Err(DomainError::not_found(CROP, *crop_id));
                }
                if harvest.crop_ids[..position].contains(crop_id) {
                    return Err(DomainError::DuplicateAssociation {
                        harvest_id: harvest.id,
                        crop_id: *crop_id,
                    });
                }
            }

            let crop_ids = harvest.crop_ids.clone();
            let handle = store.harvests.insert(harvest.id, harvest);
            if let Some(record) = store.farms.get_mut(farm) {
                insert_ordered(&mut record.harvests, handle);
            }
            for crop_id in crop_ids {
                if let Some(record) = store.crops.by_id_mut(crop_id) {
                    insert_ordered(&mut record.harvests, handle);
                }
            }
        }

        Ok(store)
    }
}
