// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Portal configuration
//!
//! Parsed from TOML. Every section and field is optional and falls back to
//! the deployment defaults below.
//!
//! ```toml
//! [workflow]
//! central_approval_units = [1, 2, 3, 4, 5, 6, 7]
//! unknown_role = "permissive"
//!
//! [retry]
//! max_retries = 3
//! base_delay = "1s"
//!
//! [autosave]
//! debounce = "1s"
//! key_prefix = "portal"
//!
//! [guard]
//! fallback_path = "/"
//! ```

use crate::unit::{CentralApprovalUnits, UnitIdError};
use crate::workflow::{UnknownRolePolicy, WorkflowEngine};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid central approval unit: {0}")]
    Unit(#[from] UnitIdError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    pub workflow: WorkflowSection,
    pub retry: RetrySection,
    pub autosave: AutosaveSection,
    pub guard: GuardSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowSection {
    /// Units whose requests need a central approval stage
    pub central_approval_units: Vec<u32>,
    pub unknown_role: UnknownRolePolicy,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            central_approval_units: (1..=7).collect(),
            unknown_role: UnknownRolePolicy::Permissive,
        }
    }
}

impl WorkflowSection {
    /// Build the workflow engine this section describes
    pub fn engine(&self) -> Result<WorkflowEngine, ConfigError> {
        let units = CentralApprovalUnits::from_ids(self.central_approval_units.iter().copied())?;
        Ok(WorkflowEngine::new(units, self.unknown_role))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySection {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Optional ceiling on a single backoff delay (uncapped when absent)
    #[serde(with = "humantime_serde")]
    pub max_delay: Option<Duration>,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutosaveSection {
    /// Quiet period before an edited value is persisted
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
    /// Namespace prepended to every auto-save key (`prefix:key`)
    pub key_prefix: Option<String>,
}

impl Default for AutosaveSection {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
            key_prefix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardSection {
    /// Where the blocking role guard redirects on denial
    pub fallback_path: String,
}

impl Default for GuardSection {
    fn default() -> Self {
        Self {
            fallback_path: "/".to_string(),
        }
    }
}

impl PortalConfig {
    /// Parse and validate configuration from TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: PortalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded portal config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.workflow.engine()?;
        if self.autosave.debounce.is_zero() {
            return Err(ConfigError::Invalid(
                "autosave.debounce must be greater than zero".to_string(),
            ));
        }
        if !self.guard.fallback_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "guard.fallback_path must be absolute: {}",
                self.guard.fallback_path
            )));
        }
        if let Some(max) = self.retry.max_delay {
            if max < self.retry.base_delay {
                return Err(ConfigError::Invalid(
                    "retry.max_delay must not be below retry.base_delay".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
