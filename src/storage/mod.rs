//! Persistence primitives shared by the profile and enablement stores.

pub mod json_file;
pub mod locks;

pub use json_file::{JsonFile, LoadStatus};
pub use locks::WriteLocks;
