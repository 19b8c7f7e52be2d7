//! Model predictive path tracking controller
//!
//! The controller is assembled from small pieces: a flat variable layout
//! across the horizon, a differentiable kinematic bicycle step, a normalized
//! multi-term cost, model-coupling equality residuals, per-variable and
//! per-constraint bounds, and an orchestrator that hands the assembled
//! program to the external solver.

pub mod autodiff;
pub mod bounds;
pub mod config;
pub mod constraints;
pub mod cost;
pub mod kinematics;
pub mod layout;
pub mod solver;

pub use bounds::Bounds;
pub use config::MpcConfig;
pub use layout::{Channel, VariableLayout};
pub use solver::MpcController;
