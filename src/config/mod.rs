//! Configuration for quarry
//!
//! Hierarchy, highest priority first:
//! 1. CLI flags
//! 2. Environment variables (QUARRY_*)
//! 3. Explicit `--config` file, else project config (.quarry/config.toml)
//! 4. User config (<config_dir>/quarry/config.toml)
//! 5. Built-in defaults

mod loader;
mod types;

pub use loader::{
    load, load_with_warnings, project_config_path, user_config_path, with_env_overrides,
    with_env_overrides_from, ConfigError, ConfigWarning,
};
pub use types::{CacheConfig, Config, RegistryConfig, ResolverConfig};
