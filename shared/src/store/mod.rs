//! In-memory domain store
//!
//! Owns every producer, farm, harvest and catalog crop and performs all
//! mutations. Each operation runs its checks before the first write, so a
//! rejected call leaves the store exactly as it was. Deletes cascade down the
//! ownership chain producer → farm → harvest → crop association; the crop
//! catalog itself is only changed through the catalog operations.
//!
//! The store is plain data with `&mut self` mutations. Hosts that share it
//! across threads wrap the whole store in one lock per session.

mod arena;
mod snapshot;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    CreateCropInput, CreateFarmInput, CreateHarvestInput, CreateProducerInput, Crop, Farm,
    Harvest, Producer, UpdateCrop, UpdateFarm, UpdateHarvest, UpdateProducer,
};
use crate::validation::validate_area_constraints;

use arena::{insert_ordered, remove_handle, Arena, Handle};

pub use snapshot::Snapshot;

const PRODUCER: &str = "Producer";
const FARM: &str = "Farm";
const HARVEST: &str = "Harvest";
const CROP: &str = "Crop";
const ASSOCIATION: &str = "Harvest crop";

#[derive(Debug, Clone)]
struct ProducerRecord {
    producer: Producer,
    farms: Vec<Handle>,
}

#[derive(Debug, Clone)]
struct FarmRecord {
    farm: Farm,
    harvests: Vec<Handle>,
}

#[derive(Debug, Clone)]
struct CropRecord {
    crop: Crop,
    /// Harvests linking this crop
    harvests: Vec<Handle>,
}

/// What a delete removed, cascade included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub producers: usize,
    pub farms: usize,
    pub harvests: usize,
    pub crops: usize,
    pub associations: usize,
}

/// The canonical in-memory collections
#[derive(Debug, Clone, Default)]
pub struct DomainStore {
    producers: Arena<ProducerRecord>,
    farms: Arena<FarmRecord>,
    harvests: Arena<Harvest>,
    crops: Arena<CropRecord>,
}

/// Log a rejected mutation and hand the error back
fn rejected(operation: &'static str, error: DomainError) -> DomainError {
    tracing::warn!(operation, code = error.code(), "Mutation rejected: {}", error);
    error
}

/// Field rules plus the land-use decomposition
fn check_farm(farm: &Farm) -> DomainResult<()> {
    farm.validate()?;
    if farm.total_area <= Decimal::ZERO {
        return Err(DomainError::validation(
            "total_area",
            "Total area must be greater than zero",
        ));
    }
    if !validate_area_constraints(farm.total_area, farm.cultivated_area, farm.vegetation_area) {
        return Err(DomainError::validation(
            "land_use",
            "Cultivated and vegetation areas cannot exceed the total area",
        ));
    }
    Ok(())
}

impl DomainStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Producers
    // ========================================================================

    /// Register a producer after normalizing and validating its document
    pub fn add_producer(&mut self, input: CreateProducerInput) -> DomainResult<Producer> {
        let now = Utc::now();
        let mut producer = Producer {
            id: Uuid::new_v4(),
            document: input.document,
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        producer.normalize();
        producer
            .validate()
            .map_err(|e| rejected("add_producer", e.into()))?;

        self.producers.insert(
            producer.id,
            ProducerRecord {
                producer: producer.clone(),
                farms: Vec::new(),
            },
        );
        tracing::debug!(producer_id = %producer.id, "Producer added");
        Ok(producer)
    }

    pub fn update_producer(&mut self, id: Uuid, patch: UpdateProducer) -> DomainResult<Producer> {
        let mut producer = self
            .producers
            .by_id(id)
            .map(|record| record.producer.clone())
            .ok_or_else(|| rejected("update_producer", DomainError::not_found(PRODUCER, id)))?;

        patch.apply_to(&mut producer);
        producer.normalize();
        producer
            .validate()
            .map_err(|e| rejected("update_producer", e.into()))?;
        producer.updated_at = Utc::now();

        if let Some(record) = self.producers.by_id_mut(id) {
            record.producer = producer.clone();
        }
        tracing::debug!(producer_id = %id, "Producer updated");
        Ok(producer)
    }

    /// Remove a producer with its farms, their harvests and crop links
    pub fn delete_producer(&mut self, id: Uuid) -> DomainResult<CascadeReport> {
        let record = self
            .producers
            .remove(id)
            .ok_or_else(|| rejected("delete_producer", DomainError::not_found(PRODUCER, id)))?;

        let mut report = CascadeReport {
            producers: 1,
            ..CascadeReport::default()
        };
        for farm_handle in record.farms {
            let farm_id = self.farms.get(farm_handle).map(|farm| farm.farm.id);
            if let Some(farm_id) = farm_id {
                self.cascade_farm(farm_id, &mut report);
            }
        }

        tracing::info!(
            producer_id = %id,
            farms = report.farms,
            harvests = report.harvests,
            associations = report.associations,
            "Producer deleted"
        );
        Ok(report)
    }

    pub fn producer(&self, id: Uuid) -> Option<Producer> {
        self.producers.by_id(id).map(|record| record.producer.clone())
    }

    pub fn producers(&self) -> Vec<Producer> {
        self.producers
            .iter()
            .map(|record| record.producer.clone())
            .collect()
    }

    // ========================================================================
    // Farms
    // ========================================================================

    pub fn add_farm(&mut self, input: CreateFarmInput) -> DomainResult<Farm> {
        let producer_handle = self.producers.handle(input.producer_id).ok_or_else(|| {
            rejected("add_farm", DomainError::not_found(PRODUCER, input.producer_id))
        })?;

        let now = Utc::now();
        let mut farm = Farm {
            id: Uuid::new_v4(),
            producer_id: input.producer_id,
            name: input.name,
            city: input.city,
            state: input.state,
            address: input.address,
            total_area: input.total_area,
            cultivated_area: input.cultivated_area,
            vegetation_area: input.vegetation_area,
            created_at: now,
            updated_at: now,
        };
        farm.normalize();
        check_farm(&farm).map_err(|e| rejected("add_farm", e))?;

        let handle = self.farms.insert(
            farm.id,
            FarmRecord {
                farm: farm.clone(),
                harvests: Vec::new(),
            },
        );
        if let Some(owner) = self.producers.get_mut(producer_handle) {
            insert_ordered(&mut owner.farms, handle);
        }
        tracing::debug!(farm_id = %farm.id, producer_id = %farm.producer_id, "Farm added");
        Ok(farm)
    }

    /// Apply a patch; the merged farm must still satisfy every farm rule
    pub fn update_farm(&mut self, id: Uuid, patch: UpdateFarm) -> DomainResult<Farm> {
        let (handle, mut farm) = self
            .farms
            .handle(id)
            .and_then(|handle| self.farms.get(handle).map(|r| (handle, r.farm.clone())))
            .ok_or_else(|| rejected("update_farm", DomainError::not_found(FARM, id)))?;

        let previous_owner = farm.producer_id;
        patch.apply_to(&mut farm);
        farm.normalize();

        let new_owner = if farm.producer_id != previous_owner {
            let owner = self.producers.handle(farm.producer_id).ok_or_else(|| {
                rejected("update_farm", DomainError::not_found(PRODUCER, farm.producer_id))
            })?;
            Some(owner)
        } else {
            None
        };
        check_farm(&farm).map_err(|e| rejected("update_farm", e))?;
        farm.updated_at = Utc::now();

        if let Some(new_owner) = new_owner {
            if let Some(old) = self.producers.by_id_mut(previous_owner) {
                remove_handle(&mut old.farms, handle);
            }
            if let Some(owner) = self.producers.get_mut(new_owner) {
                insert_ordered(&mut owner.farms, handle);
            }
        }
        if let Some(record) = self.farms.get_mut(handle) {
            record.farm = farm.clone();
        }
        tracing::debug!(farm_id = %id, "Farm updated");
        Ok(farm)
    }

    /// Remove a farm with its harvests and their crop links
    pub fn delete_farm(&mut self, id: Uuid) -> DomainResult<CascadeReport> {
        let (handle, producer_id) = self
            .farms
            .handle(id)
            .and_then(|handle| self.farms.get(handle).map(|r| (handle, r.farm.producer_id)))
            .ok_or_else(|| rejected("delete_farm", DomainError::not_found(FARM, id)))?;

        if let Some(owner) = self.producers.by_id_mut(producer_id) {
            remove_handle(&mut owner.farms, handle);
        }
        let mut report = CascadeReport::default();
        self.cascade_farm(id, &mut report);

        tracing::info!(
            farm_id = %id,
            harvests = report.harvests,
            associations = report.associations,
            "Farm deleted"
        );
        Ok(report)
    }

    pub fn farm(&self, id: Uuid) -> Option<Farm> {
        self.farms.by_id(id).map(|record| record.farm.clone())
    }

    pub fn farms(&self) -> Vec<Farm> {
        self.farms.iter().map(|record| record.farm.clone()).collect()
    }

    /// Farms of a producer in insertion order; empty for an unknown producer
    pub fn farms_by_producer_id(&self, producer_id: Uuid) -> Vec<Farm> {
        let Some(owner) = self.producers.by_id(producer_id) else {
            return Vec::new();
        };
        owner
            .farms
            .iter()
            .filter_map(|handle| self.farms.get(*handle))
            .map(|record| record.farm.clone())
            .collect()
    }

    // ========================================================================
    // Harvests
    // ========================================================================

    pub fn add_harvest(&mut self, input: CreateHarvestInput) -> DomainResult<Harvest> {
        let farm_handle = self.farms.handle(input.farm_id).ok_or_else(|| {
            rejected("add_harvest", DomainError::not_found(FARM, input.farm_id))
        })?;

        let mut harvest = Harvest {
            id: Uuid::new_v4(),
            farm_id: input.farm_id,
            base_year: input.base_year,
            name: input.name,
            crop_ids: Vec::new(),
            created_at: Utc::now(),
        };
        harvest.normalize();
        harvest
            .validate()
            .map_err(|e| rejected("add_harvest", e.into()))?;

        let handle = self.harvests.insert(harvest.id, harvest.clone());
        if let Some(farm) = self.farms.get_mut(farm_handle) {
            insert_ordered(&mut farm.harvests, handle);
        }
        tracing::debug!(harvest_id = %harvest.id, farm_id = %harvest.farm_id, "Harvest added");
        Ok(harvest)
    }

    pub fn update_harvest(&mut self, id: Uuid, patch: UpdateHarvest) -> DomainResult<Harvest> {
        let (handle, mut harvest) = self
            .harvests
            .handle(id)
            .and_then(|handle| self.harvests.get(handle).map(|h| (handle, h.clone())))
            .ok_or_else(|| rejected("update_harvest", DomainError::not_found(HARVEST, id)))?;

        let previous_farm = harvest.farm_id;
        patch.apply_to(&mut harvest);
        harvest.normalize();

        let new_farm = if harvest.farm_id != previous_farm {
            let farm = self.farms.handle(harvest.farm_id).ok_or_else(|| {
                rejected("update_harvest", DomainError::not_found(FARM, harvest.farm_id))
            })?;
            Some(farm)
        } else {
            None
        };
        harvest
            .validate()
            .map_err(|e| rejected("update_harvest", e.into()))?;

        if let Some(new_farm) = new_farm {
            if let Some(old) = self.farms.by_id_mut(previous_farm) {
                remove_handle(&mut old.harvests, handle);
            }
            if let Some(farm) = self.farms.get_mut(new_farm) {
                insert_ordered(&mut farm.harvests, handle);
            }
        }
        if let Some(record) = self.harvests.get_mut(handle) {
            *record = harvest.clone();
        }
        tracing::debug!(harvest_id = %id, "Harvest updated");
        Ok(harvest)
    }

    /// Remove a harvest and its own crop links. Catalog crops stay.
    pub fn delete_harvest(&mut self, id: Uuid) -> DomainResult<CascadeReport> {
        let farm_id = self
            .harvests
            .by_id(id)
            .map(|harvest| harvest.farm_id)
            .ok_or_else(|| rejected("delete_harvest", DomainError::not_found(HARVEST, id)))?;

        if let (Some(handle), Some(farm)) = (self.harvests.handle(id), self.farms.by_id_mut(farm_id))
        {
            remove_handle(&mut farm.harvests, handle);
        }
        let mut report = CascadeReport::default();
        self.cascade_harvest(id, &mut report);

        tracing::info!(harvest_id = %id, associations = report.associations, "Harvest deleted");
        Ok(report)
    }

    pub fn harvest(&self, id: Uuid) -> Option<Harvest> {
        self.harvests.by_id(id).cloned()
    }

    pub fn harvests(&self) -> Vec<Harvest> {
        self.harvests.iter().cloned().collect()
    }

    /// Harvests of a farm in insertion order; empty for an unknown farm
    pub fn harvests_by_farm_id(&self, farm_id: Uuid) -> Vec<Harvest> {
        let Some(farm) = self.farms.by_id(farm_id) else {
            return Vec::new();
        };
        farm.harvests
            .iter()
            .filter_map(|handle| self.harvests.get(*handle))
            .cloned()
            .collect()
    }

    // ========================================================================
    // Harvest crop associations
    // ========================================================================

    /// Resolve both ends of an association or fail with `NotFound`
    fn association_ends(
        &self,
        operation: &'static str,
        harvest_id: Uuid,
        crop_id: Uuid,
    ) -> DomainResult<(Handle, &Harvest)> {
        let handle = self
            .harvests
            .handle(harvest_id)
            .ok_or_else(|| rejected(operation, DomainError::not_found(HARVEST, harvest_id)))?;
        let harvest = self
            .harvests
            .get(handle)
            .ok_or_else(|| rejected(operation, DomainError::not_found(HARVEST, harvest_id)))?;
        if !self.crops.contains(crop_id) {
            return Err(rejected(operation, DomainError::not_found(CROP, crop_id)));
        }
        Ok((handle, harvest))
    }

    pub fn add_crop_to_harvest(&mut self, harvest_id: Uuid, crop_id: Uuid) -> DomainResult<()> {
        let (handle, harvest) = self.association_ends("add_crop_to_harvest", harvest_id, crop_id)?;
        if harvest.has_crop(crop_id) {
            return Err(rejected(
                "add_crop_to_harvest",
                DomainError::DuplicateAssociation {
                    harvest_id,
                    crop_id,
                },
            ));
        }

        if let Some(harvest) = self.harvests.get_mut(handle) {
            harvest.crop_ids.push(crop_id);
        }
        if let Some(crop) = self.crops.by_id_mut(crop_id) {
            insert_ordered(&mut crop.harvests, handle);
        }
        tracing::debug!(harvest_id = %harvest_id, crop_id = %crop_id, "Crop linked to harvest");
        Ok(())
    }

    pub fn remove_crop_from_harvest(&mut self, harvest_id: Uuid, crop_id: Uuid) -> DomainResult<()> {
        let (handle, harvest) =
            self.association_ends("remove_crop_from_harvest", harvest_id, crop_id)?;
        if !harvest.has_crop(crop_id) {
            return Err(rejected(
                "remove_crop_from_harvest",
                DomainError::not_found(ASSOCIATION, crop_id),
            ));
        }

        if let Some(harvest) = self.harvests.get_mut(handle) {
            harvest.crop_ids.retain(|id| *id != crop_id);
        }
        if let Some(crop) = self.crops.by_id_mut(crop_id) {
            remove_handle(&mut crop.harvests, handle);
        }
        tracing::debug!(harvest_id = %harvest_id, crop_id = %crop_id, "Crop unlinked from harvest");
        Ok(())
    }

    /// Swap one linked crop for another, keeping its position in the harvest
    pub fn replace_crop_in_harvest(
        &mut self,
        harvest_id: Uuid,
        old_crop_id: Uuid,
        new_crop_id: Uuid,
    ) -> DomainResult<()> {
        let operation = "replace_crop_in_harvest";
        let (handle, harvest) = self.association_ends(operation, harvest_id, old_crop_id)?;
        let Some(position) = harvest.crop_ids.iter().position(|id| *id == old_crop_id) else {
            return Err(rejected(
                operation,
                DomainError::not_found(ASSOCIATION, old_crop_id),
            ));
        };
        if !self.crops.contains(new_crop_id) {
            return Err(rejected(operation, DomainError::not_found(CROP, new_crop_id)));
        }
        if old_crop_id == new_crop_id {
            return Ok(());
        }
        if harvest.has_crop(new_crop_id) {
            return Err(rejected(
                operation,
                DomainError::DuplicateAssociation {
                    harvest_id,
                    crop_id: new_crop_id,
                },
            ));
        }

        if let Some(harvest) = self.harvests.get_mut(handle) {
            harvest.crop_ids[position] = new_crop_id;
        }
        if let Some(old) = self.crops.by_id_mut(old_crop_id) {
            remove_handle(&mut old.harvests, handle);
        }
        if let Some(new) = self.crops.by_id_mut(new_crop_id) {
            insert_ordered(&mut new.harvests, handle);
        }
        tracing::debug!(
            harvest_id = %harvest_id,
            old_crop_id = %old_crop_id,
            new_crop_id = %new_crop_id,
            "Harvest crop replaced"
        );
        Ok(())
    }

    /// Crops linked to a harvest, in the order they were linked
    pub fn crops_by_harvest_id(&self, harvest_id: Uuid) -> Vec<Crop> {
        let Some(harvest) = self.harvests.by_id(harvest_id) else {
            return Vec::new();
        };
        harvest
            .crop_ids
            .iter()
            .filter_map(|id| self.crops.by_id(*id))
            .map(|record| record.crop.clone())
            .collect()
    }

    /// Total harvest-crop links across every harvest
    pub fn association_count(&self) -> usize {
        self.harvests.iter().map(|h| h.crop_ids.len()).sum()
    }

    // ========================================================================
    // Crop catalog
    // ========================================================================

    pub fn add_crop(&mut self, input: CreateCropInput) -> DomainResult<Crop> {
        let mut crop = Crop {
            id: Uuid::new_v4(),
            name: input.name,
            code: input.code,
        };
        crop.normalize();
        crop.validate().map_err(|e| rejected("add_crop", e.into()))?;

        self.crops.insert(
            crop.id,
            CropRecord {
                crop: crop.clone(),
                harvests: Vec::new(),
            },
        );
        tracing::debug!(crop_id = %crop.id, code = %crop.code, "Crop added to catalog");
        Ok(crop)
    }

    pub fn update_crop(&mut self, id: Uuid, patch: UpdateCrop) -> DomainResult<Crop> {
        let mut crop = self
            .crops
            .by_id(id)
            .map(|record| record.crop.clone())
            .ok_or_else(|| rejected("update_crop", DomainError::not_found(CROP, id)))?;

        patch.apply_to(&mut crop);
        crop.normalize();
        crop.validate().map_err(|e| rejected("update_crop", e.into()))?;

        if let Some(record) = self.crops.by_id_mut(id) {
            record.crop = crop.clone();
        }
        tracing::debug!(crop_id = %id, "Crop updated");
        Ok(crop)
    }

    /// Drop a catalog crop and unlink it from every harvest
    pub fn delete_crop(&mut self, id: Uuid) -> DomainResult<CascadeReport> {
        let record = self
            .crops
            .remove(id)
            .ok_or_else(|| rejected("delete_crop", DomainError::not_found(CROP, id)))?;

        let mut report = CascadeReport {
            crops: 1,
            ..CascadeReport::default()
        };
        for handle in record.harvests {
            if let Some(harvest) = self.harvests.get_mut(handle) {
                harvest.crop_ids.retain(|crop_id| *crop_id != id);
                report.associations += 1;
            }
        }

        tracing::info!(crop_id = %id, associations = report.associations, "Crop deleted");
        Ok(report)
    }

    pub fn crop(&self, id: Uuid) -> Option<Crop> {
        self.crops.by_id(id).map(|record| record.crop.clone())
    }

    pub fn crops(&self) -> Vec<Crop> {
        self.crops.iter().map(|record| record.crop.clone()).collect()
    }

    // ========================================================================
    // Counts and internal views
    // ========================================================================

    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }

    pub fn farm_count(&self) -> usize {
        self.farms.len()
    }

    pub fn harvest_count(&self) -> usize {
        self.harvests.len()
    }

    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
            && self.farms.is_empty()
            && self.harvests.is_empty()
            && self.crops.is_empty()
    }

    pub(crate) fn iter_farms(&self) -> impl Iterator<Item = &Farm> {
        self.farms.iter().map(|record| &record.farm)
    }

    pub(crate) fn iter_harvests(&self) -> impl Iterator<Item = &Harvest> {
        self.harvests.iter()
    }

    pub(crate) fn crop_ref(&self, id: Uuid) -> Option<&Crop> {
        self.crops.by_id(id).map(|record| &record.crop)
    }

    // ========================================================================
    // Cascades
    // ========================================================================

    /// Remove a farm that is already detached from its producer
    fn cascade_farm(&mut self, farm_id: Uuid, report: &mut CascadeReport) {
        let Some(record) = self.farms.remove(farm_id) else {
            return;
        };
        report.farms += 1;
        for handle in record.harvests {
            let harvest_id = self.harvests.get(handle).map(|harvest| harvest.id);
            if let Some(harvest_id) = harvest_id {
                self.cascade_harvest(harvest_id, report);
            }
        }
    }

    /// Remove a harvest that is already detached from its farm
    fn cascade_harvest(&mut self, harvest_id: Uuid, report: &mut CascadeReport) {
        let Some(handle) = self.harvests.handle(harvest_id) else {
            return;
        };
        let Some(harvest) = self.harvests.remove(harvest_id) else {
            return;
        };
        report.harvests += 1;
        for crop_id in harvest.crop_ids {
            if let Some(crop) = self.crops.by_id_mut(crop_id) {
                remove_handle(&mut crop.harvests, handle);
            }
            report.associations += 1;
        }
    }
}
