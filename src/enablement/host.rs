//! Host Collaborator
//!
//! The host owns the real enable/disable mechanism. Implementations:
//! - `SimulatedHost`: in-memory `<id>:enabled` context flags
//! - `CommandHost`: runs configured command templates per identifier

use std::collections::BTreeMap;
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::HostConfig;
use crate::types::{ExtProfileError, Result};

/// Placeholder replaced by the tool identifier in command templates
pub const ID_PLACEHOLDER: &str = "{id}";

/// Host-side enable/disable operations
#[async_trait]
pub trait ExtensionHost: Send + Sync {
    async fn enable(&self, identifier: &str) -> Result<()>;

    async fn disable(&self, identifier: &str) -> Result<()>;

    /// Host name for logging
    fn name(&self) -> &str;

    async fn set_enabled(&self, identifier: &str, enabled: bool) -> Result<()> {
        if enabled {
            self.enable(identifier).await
        } else {
            self.disable(identifier).await
        }
    }
}

// =============================================================================
// Simulated Host
// =============================================================================

/// Records the last requested state per identifier without side effects
#[derive(Debug, Default)]
pub struct SimulatedHost {
    context: Mutex<BTreeMap<String, bool>>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state pushed for `identifier`
    pub fn context(&self, identifier: &str) -> Option<bool> {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .copied()
    }

    /// Snapshot of all `<id>:enabled` context keys
    pub fn context_keys(&self) -> BTreeMap<String, bool> {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, enabled)| (format!("{}:enabled", id), *enabled))
            .collect()
    }

    fn record(&self, identifier: &str, enabled: bool) {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identifier.to_string(), enabled);
        info!("{}:enabled = {}", identifier, enabled);
    }
}

#[async_trait]
impl ExtensionHost for SimulatedHost {
    async fn enable(&self, identifier: &str) -> Result<()> {
        self.record(identifier, true);
        Ok(())
    }

    async fn disable(&self, identifier: &str) -> Result<()> {
        self.record(identifier, false);
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

// =============================================================================
// Command Host
// =============================================================================

/// Runs an external command per identifier, e.g.
/// `["code", "--enable-extension", "{id}"]`
#[derive(Debug, Clone)]
pub struct CommandHost {
    enable: Vec<String>,
    disable: Vec<String>,
    timeout: Duration,
}

impl CommandHost {
    pub fn new(enable: Vec<String>, disable: Vec<String>, timeout: Duration) -> Result<Self> {
        for template in [&enable, &disable] {
            if template.first().is_none_or(|p| p.trim().is_empty()) {
                return Err(ExtProfileError::Config(
                    "Host command template must start with a program name".to_string(),
                ));
            }
        }
        Ok(Self {
            enable,
            disable,
            timeout,
        })
    }

    /// Build from config; `None` unless both templates are configured
    pub fn from_config(config: &HostConfig) -> Result<Option<Self>> {
        match (&config.enable, &config.disable) {
            (Some(enable), Some(disable)) => Ok(Some(Self::new(
                enable.clone(),
                disable.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            _ => Ok(None),
        }
    }

    fn render(template: &[String], identifier: &str) -> Vec<String> {
        template
            .iter()
            .map(|arg| arg.replace(ID_PLACEHOLDER, identifier))
            .collect()
    }

    async fn run(&self, template: &[String], identifier: &str) -> Result<()> {
        let argv = Self::render(template, identifier);
        let Some((program, args)) = argv.split_first() else {
            return Err(ExtProfileError::host(identifier, "empty command"));
        };

        debug!("Running host command: {}", argv.join(" "));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ExtProfileError::host(identifier, format!("failed to spawn {}: {}", program, e))
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ExtProfileError::host(
                    identifier,
                    format!("{} timed out after {}s", program, self.timeout.as_secs()),
                )
            })?
            .map_err(|e| ExtProfileError::host(identifier, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("{} exited with {}", program, output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(ExtProfileError::host(identifier, message));
        }

        Ok(())
    }
}

#[async_trait]
impl ExtensionHost for CommandHost {
    async fn enable(&self, identifier: &str) -> Result<()> {
        self.run(&self.enable, identifier).await
    }

    async fn disable(&self, identifier: &str) -> Result<()> {
        self.run(&self.disable, identifier).await
    }

    fn name(&self) -> &str {
        "command"
    }
}
