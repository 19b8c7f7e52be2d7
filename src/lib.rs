//! bicycle_mpc - model predictive path tracking for a kinematic bicycle vehicle
//!
//! This crate formulates path tracking as a nonlinear program over a short
//! horizon: the kinematic bicycle model couples consecutive timesteps through
//! equality constraints, a weighted cost trades tracking error against
//! control effort and smoothness, and an external solver returns the
//! trajectory from which the next steering/acceleration command is read.

// Core modules
pub mod common;

// Controller modules
pub mod mpc;

// Re-export common types for convenience
pub use common::{MpcError, MpcResult, MpcSolution, VehicleState};
pub use mpc::{Channel, MpcConfig, MpcController, VariableLayout};
