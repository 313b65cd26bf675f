//! Dashboard aggregation over the current store state
//!
//! Pure and recomputed on every call. Percentages are left to the caller
//! (see `land_use_percentage`), which also owns the zero-hectare guard.
//! Hectare sums saturate at `Decimal::MAX` instead of overflowing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{CropCount, DashboardData, LandUse, StateCount};
use crate::store::DomainStore;
use crate::types::BrazilianState;

/// Derive dashboard statistics from the store
pub fn dashboard(store: &DomainStore) -> DashboardData {
    let mut total_farms = 0u64;
    let mut total_hectares = Decimal::ZERO;
    let mut land_use = LandUse::default();
    let mut farms_by_state: Vec<StateCount> = Vec::new();
    let mut state_slots: HashMap<BrazilianState, usize> = HashMap::new();

    for farm in store.iter_farms() {
        total_farms += 1;
        // Sums saturate at Decimal::MAX
        total_hectares = total_hectares.saturating_add(farm.total_area);
        land_use.arable = land_use.arable.saturating_add(farm.cultivated_area);
        land_use.vegetation = land_use.vegetation.saturating_add(farm.vegetation_area);

        match state_slots.get(&farm.state) {
            Some(&slot) => farms_by_state[slot].count += 1,
            None => {
                state_slots.insert(farm.state, farms_by_state.len());
                farms_by_state.push(StateCount {
                    state: farm.state,
                    count: 1,
                });
            }
        }
    }

    // Every association counts, so one crop on three harvests counts 3
    let mut crops_grouped: Vec<CropCount> = Vec::new();
    let mut crop_slots: HashMap<Uuid, usize> = HashMap::new();
    for harvest in store.iter_harvests() {
        for crop_id in &harvest.crop_ids {
            if let Some(&slot) = crop_slots.get(crop_id) {
                crops_grouped[slot].count += 1;
                continue;
            }
            let Some(crop) = store.crop_ref(*crop_id) else {
                continue;
            };
            crop_slots.insert(*crop_id, crops_grouped.len());
            crops_grouped.push(CropCount {
                crop_id: *crop_id,
                crop_name: crop.name.clone(),
                count: 1,
            });
        }
    }

    DashboardData {
        total_farms,
        total_hectares,
        farms_by_state,
        crops_grouped,
        land_use,
    }
}

impl DashboardData {
    pub fn from_store(store: &DomainStore) -> Self {
        dashboard(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateCropInput, CreateFarmInput, CreateHarvestInput, CreateProducerInput, UpdateFarm,
    };

    fn store_with_producer() -> (DomainStore, Uuid) {
        let mut store = DomainStore::new();
        let producer = store
            .add_producer(CreateProducerInput {
                document: "11222333000181".to_string(),
                name: "Agropecuária Horizonte".to_string(),
            })
            .unwrap();
        (store, producer.id)
    }

    fn add_farm(
        store: &mut DomainStore,
        producer_id: Uuid,
        state: BrazilianState,
        total: i64,
        cultivated: i64,
        vegetation: i64,
    ) -> Uuid {
        store
            .add_farm(CreateFarmInput {
                producer_id,
                name: format!("Fazenda {}", state),
                city: "Cidade".to_string(),
                state,
                address: "Estrada Municipal".to_string(),
                total_area: Decimal::from(total),
                cultivated_area: Decimal::from(cultivated),
                vegetation_area: Decimal::from(vegetation),
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_empty_store_dashboard() {
        let data = dashboard(&DomainStore::new());
        assert_eq!(data, DashboardData::default());
    }

    #[test]
    fn test_totals_and_land_use() {
        let (mut store, producer_id) = store_with_producer();
        add_farm(&mut store, producer_id, BrazilianState::Sp, 100, 60, 40);
        add_farm(&mut store, producer_id, BrazilianState::Go, 250, 100, 50);

        let data = dashboard(&store);

        assert_eq!(data.total_farms, 2);
        assert_eq!(data.total_hectares, Decimal::from(350));
        assert_eq!(data.land_use.arable, Decimal::from(160));
        assert_eq!(data.land_use.vegetation, Decimal::from(90));
    }

    #[test]
    fn test_farms_by_state_first_seen_order() {
        let (mut store, producer_id) = store_with_producer();
        add_farm(&mut store, producer_id, BrazilianState::To, 10, 1, 1);
        add_farm(&mut store, producer_id, BrazilianState::Ac, 10, 1, 1);
        add_farm(&mut store, producer_id, BrazilianState::To, 10, 1, 1);

        let data = dashboard(&store);

        assert_eq!(
            data.farms_by_state,
            vec![
                StateCount {
                    state: BrazilianState::To,
                    count: 2
                },
                StateCount {
                    state: BrazilianState::Ac,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_crops_grouped_counts_associations() {
        let (mut store, producer_id) = store_with_producer();
        let farm_id = add_farm(&mut store, producer_id, BrazilianState::Mt, 10, 5, 2);
        let soy = store
            .add_crop(CreateCropInput {
                name: "Soja".to_string(),
                code: "SOJ".to_string(),
            })
            .unwrap();
        let corn = store
            .add_crop(CreateCropInput {
                name: "Milho".to_string(),
                code: "MIL".to_string(),
            })
            .unwrap();
        for year in [2021, 2022, 2023] {
            let harvest = store
                .add_harvest(CreateHarvestInput {
                    farm_id,
                    base_year: year,
                    name: format!("Safra {}", year),
                })
                .unwrap();
            store.add_crop_to_harvest(harvest.id, soy.id).unwrap();
            if year == 2023 {
                store.add_crop_to_harvest(harvest.id, corn.id).unwrap();
            }
        }

        let data = dashboard(&store);

        assert_eq!(
            data.crops_grouped,
            vec![
                CropCount {
                    crop_id: soy.id,
                    crop_name: "Soja".to_string(),
                    count: 3
                },
                CropCount {
                    crop_id: corn.id,
                    crop_name: "Milho".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_hectare_sums_saturate() {
        let (mut store, producer_id) = store_with_producer();
        for _ in 0..2 {
            store
                .add_farm(CreateFarmInput {
                    producer_id,
                    name: "Fazenda Sem Fim".to_string(),
                    city: "Cidade".to_string(),
                    state: BrazilianState::Am,
                    address: "Rio Negro".to_string(),
                    total_area: Decimal::MAX,
                    cultivated_area: Decimal::MAX,
                    vegetation_area: Decimal::ZERO,
                })
                .unwrap();
        }

        let data = dashboard(&store);

        assert_eq!(data.total_farms, 2);
        assert_eq!(data.total_hectares, Decimal::MAX);
        assert_eq!(data.land_use.arable, Decimal::MAX);
        assert_eq!(data.land_use.vegetation, Decimal::ZERO);
    }

    #[test]
    fn test_dashboard_follows_mutations() {
        let (mut store, producer_id) = store_with_producer();
        let first = add_farm(&mut store, producer_id, BrazilianState::Sp, 100, 10, 10);
        add_farm(&mut store, producer_id, BrazilianState::Rj, 30, 10, 10);

        store
            .update_farm(
                first,
                UpdateFarm {
                    total_area: Some(Decimal::from(40)),
                    state: Some(BrazilianState::Rj),
                    ..UpdateFarm::default()
                },
            )
            .unwrap();
        let data = DashboardData::from_store(&store);
        assert_eq!(data.total_hectares, Decimal::from(70));
        assert_eq!(
            data.farms_by_state,
            vec![StateCount {
                state: BrazilianState::Rj,
                count: 2
            }]
        );

        store.delete_farm(first).unwrap();
        let data = dashboard(&store);
        assert_eq!(data.total_farms, 1);
        assert_eq!(data.total_hectares, Decimal::from(30));
    }
}
