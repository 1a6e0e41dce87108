//! Lockfile reconciliation
//!
//! - `frozen` - replay a previous lockfile (`--frozen-lockfile`)
//! - `upgrade_gate` - stop at major-version upgrades relative to the lockfile

mod frozen;
mod upgrade_gate;

pub use frozen::use_modules_from_lock;
pub use upgrade_gate::{detect_major_upgrades, MajorUpgrade, UpgradeGate};
