//! Domain models for the Farm Admin core

mod crop;
mod dashboard;
mod farm;
mod harvest;
mod producer;

pub use crop::*;
pub use dashboard::*;
pub use farm::*;
pub use harvest::*;
pub use producer::*;
