//! Common test infrastructure shared across integration tests.
//!
//! This module provides:
//! - `targets`: functions under test with known, deliberate defects
//! - `fixtures`: scaled-down fixture configurations and stream helpers
//!
//! # Usage
//!
//! From any integration test file:
//! ```ignore
//! #[path = "common/mod.rs"]
//! mod common;
//! use common::{diverges_at, tiny_config};
//! ```

pub mod fixtures;
pub mod targets;

// Not every integration crate uses every helper.
#[allow(unused_imports)]
pub use fixtures::{locate, tiny_config, tiny_float_config};
#[allow(unused_imports)]
pub use targets::{counting, diverges_at, diverges_at_float, reciprocal_weight};
