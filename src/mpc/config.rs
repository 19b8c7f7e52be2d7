//! Controller configuration
//!
//! All tunable constants live in one immutable struct constructed at startup:
//! horizon, physical constants, actuator limits, cost normalization scales,
//! cost weights, and solver settings. The defaults reproduce the tuning the
//! controller ships with.

use std::f64::consts::PI;
use std::time::Duration;

use crate::common::{MpcError, MpcResult};

/// mph per m/s
const MPH_PER_MPS: f64 = 2.236_936;

/// Configuration for [`crate::mpc::MpcController`].
///
/// Immutable after construction; changing the horizon requires building a
/// new controller since the variable layout is derived from it.
#[derive(Debug, Clone)]
pub struct MpcConfig {
    /// number of predicted timesteps N
    pub horizon: usize,
    /// timestep duration [s]
    pub dt: f64,
    /// front-axle-to-center-of-gravity distance [m]
    pub lf: f64,

    /// maximum steering angle magnitude [rad]
    pub max_steer: f64,
    /// maximum acceleration magnitude [m/s^2]
    pub max_accel: f64,
    /// speed limit [mph]; bounds the speed variables once converted to m/s
    pub speed_limit_mph: f64,

    // Normalization scales: |value| is expected to stay below the scale most
    // of the time, so every squared term is roughly unit-sized before its
    // weight is applied.
    /// cross-track error scale [m]
    pub std_cte: f64,
    /// heading error scale [rad]
    pub std_epsi: f64,
    /// typical per-step steering change [rad]
    pub std_dsteer: f64,
    /// typical per-step acceleration change [m/s^2]
    pub std_daccel: f64,

    // Cost weights
    /// cross-track error weight; scaled further by (N - t) per timestep
    pub w_cte: f64,
    /// heading error weight
    pub w_epsi: f64,
    /// speed-tracking weight
    pub w_speed: f64,
    /// steering effort weight
    pub w_steer: f64,
    /// acceleration effort weight
    pub w_accel: f64,
    /// steering smoothness weight
    pub w_dsteer: f64,
    /// acceleration smoothness weight
    pub w_daccel: f64,

    // Solver settings
    /// wall-clock budget for one solve call
    pub max_solve_time: Duration,
    /// tolerance on the equality-constraint infeasibility
    pub constraint_tolerance: f64,
    /// tolerance for the inner (unconstrained) iterations
    pub inner_tolerance: f64,
    /// cap on outer (penalty/multiplier) iterations
    pub max_outer_iterations: usize,
    /// L-BFGS memory length of the inner solver
    pub lbfgs_memory: usize,
}

impl Default for MpcConfig {
    fn default() -> Self {
        let max_steer = 0.436332; // 25 degrees
        let max_accel = 1.0;
        Self {
            horizon: 12,
            dt: 0.1,
            lf: 2.67,
            max_steer,
            max_accel,
            speed_limit_mph: 70.0,
            std_cte: 4.0,
            std_epsi: PI / 5.0,
            std_dsteer: max_steer / 4.0,
            std_daccel: max_accel / 2.0,
            w_cte: 50.0,
            w_epsi: 2.0,
            w_speed: 50.0,
            w_steer: 5.0,
            w_accel: 1.0,
            w_dsteer: 50.0,
            w_daccel: 1.0,
            max_solve_time: Duration::from_millis(500),
            constraint_tolerance: 1e-4,
            inner_tolerance: 1e-6,
            max_outer_iterations: 120,
            lbfgs_memory: 10,
        }
    }
}

impl MpcConfig {
    /// Speed limit in m/s, the unit the motion model works in.
    pub fn speed_limit(&self) -> f64 {
        self.speed_limit_mph / MPH_PER_MPS
    }

    /// Reject configurations that would produce a degenerate program.
    pub fn validate(&self) -> MpcResult<()> {
        if self.horizon < 2 {
            return Err(MpcError::InvalidConfig(format!(
                "horizon must be at least 2, got {}",
                self.horizon
            )));
        }
        if self.dt <= 0.0 {
            return Err(MpcError::InvalidConfig(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if self.lf <= 0.0 {
            return Err(MpcError::InvalidConfig(format!(
                "lf must be positive, got {}",
                self.lf
            )));
        }
        if self.max_steer <= 0.0 || self.max_accel <= 0.0 || self.speed_limit_mph <= 0.0 {
            return Err(MpcError::InvalidConfig(
                "actuator and speed limits must be positive".to_string(),
            ));
        }
        if self.std_cte <= 0.0
            || self.std_epsi <= 0.0
            || self.std_dsteer <= 0.0
            || self.std_daccel <= 0.0
        {
            return Err(MpcError::InvalidConfig(
                "normalization scales must be positive".to_string(),
            ));
        }
        if self.constraint_tolerance <= 0.0 || self.inner_tolerance <= 0.0 {
            return Err(MpcError::InvalidConfig(
                "solver tolerances must be positive".to_string(),
            ));
        }
        if self.max_outer_iterations == 0 || self.lbfgs_memory == 0 {
            return Err(MpcError::InvalidConfig(
                "solver iteration and memory settings must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
