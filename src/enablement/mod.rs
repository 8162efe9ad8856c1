//! Tool Enablement
//!
//! - `store`: persisted enabled/disabled map and reconciliation
//! - `host`: the host-side enable/disable collaborator

pub mod host;
pub mod store;

pub use host::{CommandHost, ExtensionHost, SimulatedHost};
pub use store::{AppliedState, EnablementStore, HostFailure, ReconcileReport};
