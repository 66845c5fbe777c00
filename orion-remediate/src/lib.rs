//! Orion Remediate - custom property administration for SolarWinds Orion
//!
//! - Node classification remediation (Environment, Device_Type, Device_Function)
//! - Custom property list / create / delete
//! - SWIS REST client behind the `Inventory` / `Connector` traits

pub mod applier;
pub mod classifier;
pub mod config;
pub mod custom_props;
pub mod diff;
pub mod driver;
pub mod error;
pub mod fetcher;
pub mod inventory;
pub mod models;
pub mod report;
pub mod rules;
pub mod servers;
pub mod swis;

pub use error::OrionError;
pub use inventory::{Connector, Inventory};
pub use models::{DerivedField, NodeRecord, PropertyMap, Row, UpdatePatch};
