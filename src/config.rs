use crate::error::ConfigError;
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use std::path::Path;

/// Settings applied while the action pool is being built.
///
/// ```yaml
/// exclude: [Flee]
/// include_only: [Chase, Patrol]
/// seed: 42
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Action names that never enter the pool.
    pub exclude: Vec<String>,
    /// When present, only these action names may enter the pool.
    pub include_only: Option<Vec<String>>,
    /// Seed for reproducible random draws. Entropy is used when absent.
    pub seed: Option<u64>,
}

impl PoolConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    pub fn allows(&self, name: &str) -> bool {
        if self.exclude.iter().any(|excluded| excluded == name) {
            return false;
        }
        self.include_only
            .as_ref()
            .map_or(true, |included| included.iter().any(|i| i == name))
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
