//! WebAssembly module for the Farm Admin tool
//!
//! Provides client-side computation for:
//! - CPF/CNPJ validation and progressive formatting in producer forms
//! - Land-use checks in farm forms
//! - Dashboard aggregation over a fetched snapshot

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{dashboard, DomainStore, Snapshot};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&JsValue::from_str("farm-admin core loaded"));
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok()
}

/// Check a digits-only CPF or CNPJ
#[wasm_bindgen(js_name = validateDocument)]
pub fn validate_document(raw: &str) -> bool {
    is_valid_document(raw)
}

/// Add separators for display; partial input is returned unchanged
#[wasm_bindgen(js_name = formatDocument)]
pub fn format_document_js(raw: &str) -> String {
    format_document(raw)
}

/// "CPF", "CNPJ" or undefined
#[wasm_bindgen(js_name = getDocumentType)]
pub fn get_document_type(raw: &str) -> Option<String> {
    document_type(raw).map(|kind| kind.to_string())
}

/// Strip punctuation typed into the document field
#[wasm_bindgen(js_name = normalizeDocument)]
pub fn normalize_document_js(raw: &str) -> String {
    normalize_document(raw)
}

/// Cultivated plus vegetation must fit in the total. NaN or infinite
/// inputs are rejected.
#[wasm_bindgen(js_name = validateAreaConstraints)]
pub fn validate_area_constraints_js(total: f64, cultivated: f64, vegetation: f64) -> bool {
    match (to_decimal(total), to_decimal(cultivated), to_decimal(vegetation)) {
        (Some(total), Some(cultivated), Some(vegetation)) => {
            validate_area_constraints(total, cultivated, vegetation)
        }
        _ => false,
    }
}

/// Hectares left to assign in the farm form
#[wasm_bindgen(js_name = remainingArea)]
pub fn remaining_area_js(total: f64, cultivated: f64, vegetation: f64) -> f64 {
    match (to_decimal(total), to_decimal(cultivated), to_decimal(vegetation)) {
        (Some(total), Some(cultivated), Some(vegetation)) => {
            remaining_area(total, cultivated, vegetation)
                .and_then(|area| area.to_f64())
                .unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Percentage of `part` in `total`, zero for an empty total
#[wasm_bindgen(js_name = landUsePercentage)]
pub fn land_use_percentage_js(part: f64, total: f64) -> f64 {
    match (to_decimal(part), to_decimal(total)) {
        (Some(part), Some(total)) => land_use_percentage(part, total).to_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Admit a snapshot JSON and return the dashboard as JSON
#[wasm_bindgen(js_name = computeDashboard)]
pub fn compute_dashboard(snapshot_json: &str) -> Result<String, JsValue> {
    dashboard_json(snapshot_json).map_err(|e| js_sys::Error::new(&e).into())
}

fn dashboard_json(snapshot_json: &str) -> Result<String, String> {
    let snapshot: Snapshot = serde_json::from_str(snapshot_json)
        .map_err(|e| format!("Invalid snapshot JSON: {}", e))?;
    let store = DomainStore::from_snapshot(snapshot).map_err(|e| e.to_string())?;
    serde_json::to_string(&dashboard(&store)).map_err(|e| format!("Serialization error: {}", e))
}
