//! Detection Engine
//!
//! Evaluates the ordered rule table against a root and returns the first
//! match. A predicate I/O failure aborts the whole run; there is no retry.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::marker::{GlobOptions, MarkerProbe};
use super::rules::{DetectionRule, default_rules};
use crate::config::DetectionConfig;
use crate::types::{ProjectType, Result};

/// Result of a detection run with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub project_type: ProjectType,
    /// Index of the matching rule, None when falling back to Unknown
    pub rule_index: Option<usize>,
    /// Marker expression of the matching rule
    pub matched: Option<String>,
}

/// Ordered, short-circuiting rule evaluator
#[derive(Debug, Clone)]
pub struct DetectionEngine {
    rules: Vec<DetectionRule>,
    options: GlobOptions,
}

impl DetectionEngine {
    /// Engine with the built-in rule table
    pub fn new(config: &DetectionConfig) -> Result<Self> {
        Self::with_rules(default_rules(), config)
    }

    /// Engine with a custom rule table (order is precedence)
    pub fn with_rules(rules: Vec<DetectionRule>, config: &DetectionConfig) -> Result<Self> {
        Ok(Self {
            rules,
            options: GlobOptions::from_config(config)?,
        })
    }

    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    /// Classify the project at `root`
    pub async fn detect(&self, root: &Path) -> Result<ProjectType> {
        Ok(self.explain(root).await?.project_type)
    }

    /// Classify the project at `root`, reporting which rule matched
    pub async fn explain(&self, root: &Path) -> Result<Detection> {
        let probe = MarkerProbe::new(root, self.options.clone());

        for (index, rule) in self.rules.iter().enumerate() {
            debug!("rule {} ({}): {}", index, rule.project_type, rule.marker);
            if rule.marker.evaluate(&probe).await? {
                info!(
                    "Detected {} at {} (rule {}: {})",
                    rule.project_type,
                    root.display(),
                    index,
                    rule.marker
                );
                return Ok(Detection {
                    project_type: rule.project_type,
                    rule_index: Some(index),
                    matched: Some(rule.marker.to_string()),
                });
            }
        }

        info!("No rule matched at {}, project type Unknown", root.display());
        Ok(Detection {
            project_type: ProjectType::Unknown,
            rule_index: None,
            matched: None,
        })
    }
}
