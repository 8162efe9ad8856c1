//! Tool Catalogs
//!
//! - `recommended`: static project type → recommended identifiers mapping
//! - `installed`: host-supplied list of installed tools

pub mod installed;
pub mod recommended;

pub use installed::InstalledCatalog;
pub use recommended::{is_recommended, recommended_identifiers};
