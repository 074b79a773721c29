//! Configuration and dependency wiring.

mod dependencies;

pub use dependencies::{CatalogServices, Dependencies};
