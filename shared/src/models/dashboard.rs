//! Dashboard read models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{BrazilianState, Hectares};

/// Statistics shown on the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_farms: u64,
    pub total_hectares: Hectares,
    /// One entry per state, in first-seen order
    pub farms_by_state: Vec<StateCount>,
    /// Harvest-crop associations per crop, in first-seen order
    pub crops_grouped: Vec<CropCount>,
    pub land_use: LandUse,
}

/// Farm count for a single state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateCount {
    pub state: BrazilianState,
    pub count: u64,
}

/// Association count for a single crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CropCount {
    pub crop_id: Uuid,
    pub crop_name: String,
    pub count: u64,
}

/// Land use totals across all farms
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LandUse {
    /// Sum of cultivated areas
    pub arable: Hectares,
    /// Sum of preserved vegetation areas
    pub vegetation: Hectares,
}

/// Share of `part` in `total` as a percentage, zero when `total` is zero.
/// A share too large for a `Decimal` saturates at `Decimal::MAX` (or
/// `Decimal::MIN` when the signs differ).
pub fn land_use_percentage(part: Hectares, total: Hectares) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(total)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() == total.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}
