pub mod error;
pub mod profile;
pub mod project;
pub mod utils;

pub use error::{ErrorCategory, ExtProfileError, Result, ResultExt};
pub use profile::{
    EnablementDocument, ExtensionEntry, InstalledTool, Profile, ProfileDocument, ProfileKind,
};
pub use project::ProjectType;
pub use utils::{log_filter_error, log_filter_warn};
