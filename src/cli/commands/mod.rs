pub mod config;
pub mod detect;
pub mod profile;
pub mod status;
