//! Common types and error definitions for bicycle_mpc
//!
//! This module provides the caller-facing data records and the error
//! taxonomy shared across the crate.

pub mod types;
pub mod error;

pub use types::*;
pub use error::*;
