use console::style;

use crate::storage::LoadStatus;
use crate::types::ExtensionEntry;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<14} {}", style(label).dim(), value);
    }

    /// One profile entry with its flag and the recorded host state
    pub fn entry(&self, entry: &ExtensionEntry, host_enabled: bool) {
        let mark = if entry.is_enabled {
            style("●").green()
        } else {
            style("○").dim()
        };
        let drift = if entry.is_enabled == host_enabled {
            String::new()
        } else {
            format!(
                " {}",
                style(if host_enabled {
                    "(enabled on host)"
                } else {
                    "(disabled on host)"
                })
                .yellow()
            )
        };
        println!("  {} {} {}{}", mark, entry.name, style(&entry.identifier).dim(), drift);
    }

    pub fn load_status(&self, what: &str, status: &LoadStatus) {
        if let Some(message) = load_status_warning(what, status) {
            self.warning(&message);
        }
    }
}

/// A malformed file stays on disk untouched until the next successful save
fn load_status_warning(what: &str, status: &LoadStatus) -> Option<String> {
    match status {
        LoadStatus::CorruptionRecovered { reason } => Some(format!(
            "{} file was malformed and is ignored; defaults in use until the next save ({})",
            what, reason
        )),
        LoadStatus::Missing | LoadStatus::Loaded => None,
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
