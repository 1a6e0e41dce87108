//! Domain Layer
//!
//! The resolver's model, without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Manifests, modules and the lockfile
//! - `value_objects/` - Versions, constraints, typed arguments, cancellation
//! - `services/` - The resolution ledger and work queue
//! - `ports/` - Interfaces to version resolution, module content, the cache and the lockfile
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
