//! Command implementations

mod resolve;

pub use resolve::cmd_resolve;
