//! Encoder configuration
//!
//! Parses the `hydraedge.toml` file that fixes the CHV dimensionality, the
//! role registry, and the γ-gate strength used when encoding.
//!
//! ```toml
//! [encoder]
//! dim = 4096
//! roles = ["Subject", "Predicate", "Object"]
//! gamma = 0.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::basis::{hadamard_order, Role, DEFAULT_DIM};
use crate::{HydraEdgeError, Result};

/// Environment variable that overrides the configured dimensionality
pub const DIM_ENV_VAR: &str = "HYDRAEDGE_DIM";

/// Config file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    encoder: EncoderConfig,
}

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// CHV dimensionality (power of two)
    #[serde(default = "default_dim")]
    pub dim: usize,

    /// Role registry, in basis order
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    /// γ-gate strength applied to each bound pair before bundling
    #[serde(default)]
    pub gamma: f64,
}

fn default_dim() -> usize { DEFAULT_DIM }
fn default_roles() -> Vec<String> { Role::names() }

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            dim: default_dim(),
            roles: default_roles(),
            gamma: 0.0,
        }
    }
}

impl EncoderConfig {
    /// Load config from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| HydraEdgeError::Configuration(format!("Failed to parse config: {}", e)))?;
        Ok(file.encoder)
    }

    /// Find config in a project directory
    ///
    /// Looks for:
    /// 1. `.hydraedge/encoder.toml`
    /// 2. `hydraedge.toml`
    pub fn find(project_root: impl AsRef<Path>) -> Option<Self> {
        let root = project_root.as_ref();

        let candidates = [
            root.join(".hydraedge/encoder.toml"),
            root.join("hydraedge.toml"),
        ];

        for path in candidates {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return Some(config),
                    Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable config"),
                }
            }
        }

        None
    }

    /// Apply the `HYDRAEDGE_DIM` override, if set
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var(DIM_ENV_VAR) {
            self.dim = raw.trim().parse().map_err(|_| {
                HydraEdgeError::Configuration(format!("{} must be an integer (got '{}')", DIM_ENV_VAR, raw))
            })?;
        }
        Ok(self)
    }

    /// Project config with the environment applied, validated
    ///
    /// Falls back to the defaults when no config file is found.
    pub fn resolve(project_root: impl AsRef<Path>) -> Result<Self> {
        let config = Self::find(project_root).unwrap_or_default().with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// True if `roles` is exactly the standard registry
    pub fn uses_standard_roles(&self) -> bool {
        self.roles.len() == Role::ALL.len()
            && self.roles.iter().zip(Role::ALL.iter()).all(|(a, b)| a == b.as_str())
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.roles.is_empty() {
            return Err(HydraEdgeError::Configuration("roles must not be empty".into()));
        }
        if !self.dim.is_power_of_two() {
            return Err(HydraEdgeError::Configuration(format!(
                "dim must be a power of two (got {})",
                self.dim
            )));
        }
        let order = hadamard_order(self.roles.len());
        if self.dim < order {
            return Err(HydraEdgeError::Configuration(format!(
                "dim {} is smaller than the Hadamard order {} for {} roles",
                self.dim,
                order,
                self.roles.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(HydraEdgeError::Configuration(format!(
                "gamma must be in [0, 1] (got {})",
                self.gamma
            )));
        }
        Ok(())
    }
}
