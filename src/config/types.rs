//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::resolve::default_concurrency;

fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    15 * 60
}

/// Resolver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Worker count; the number of available CPUs when unset.
    #[serde(default)]
    pub concurrency: Option<usize>,

    #[serde(default)]
    pub allow_major_version_upgrades: bool,
}

/// Resolution cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_secs: default_ttl_secs(),
            enabled: true,
        }
    }
}

/// Module registry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub token: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

impl Config {
    pub fn concurrency(&self) -> usize {
        self.resolver
            .concurrency
            .filter(|&n| n > 0)
            .unwrap_or_else(default_concurrency)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}
