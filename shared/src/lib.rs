//! Domain core for the Farm Admin tool
//!
//! This crate holds the integrity and aggregation layer shared by the admin
//! binary and the browser forms (via WASM): taxpayer document and land-use
//! validation, the in-memory domain store and the dashboard aggregator.

pub mod dashboard;
pub mod error;
pub mod models;
pub mod store;
pub mod types;
pub mod validation;

pub use dashboard::*;
pub use error::*;
pub use models::*;
pub use store::{CascadeReport, DomainStore, Snapshot};
pub use types::*;
pub use validation::*;
