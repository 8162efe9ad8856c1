//! Project Type Detection
//!
//! - `marker`: filesystem predicates (file exists, glob matches) and their combinators
//! - `rules`: the ordered rule table
//! - `engine`: first-match evaluation over the table

pub mod engine;
pub mod marker;
pub mod rules;

pub use engine::{Detection, DetectionEngine};
pub use marker::{GlobOptions, Marker, MarkerProbe};
pub use rules::{DetectionRule, default_rules};
