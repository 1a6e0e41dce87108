//! Common test utilities for quarry integration tests.
//!
//! This module provides:
//! - Fakes: in-memory registry, lockfile store and prompters
//! - Fixtures: manifest builders and an on-disk registry for CLI tests

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

pub use fakes::*;
pub use fixtures::*;
