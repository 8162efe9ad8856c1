//! Profile management for one project root

pub mod store;

pub use store::{ProfileStore, ToggleOutcome};
