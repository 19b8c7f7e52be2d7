//! Common types used throughout bicycle_mpc

use nalgebra::Vector6;

/// Vehicle state in the locally-fixed ego frame, as produced once per
/// control cycle by the localization/reference-fitting stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// x position [m]
    pub x: f64,
    /// y position [m]
    pub y: f64,
    /// heading [rad]
    pub psi: f64,
    /// speed [m/s]
    pub v: f64,
    /// cross-track error [m], signed
    pub cte: f64,
    /// heading error [rad], signed
    pub epsi: f64,
}

impl VehicleState {
    pub fn new(x: f64, y: f64, psi: f64, v: f64, cte: f64, epsi: f64) -> Self {
        Self { x, y, psi, v, cte, epsi }
    }

    pub fn to_vector(&self) -> Vector6<f64> {
        Vector6::new(self.x, self.y, self.psi, self.v, self.cte, self.epsi)
    }

    /// State channels in decision-vector layout order.
    pub fn to_array(&self) -> [f64; 6] {
        [self.x, self.y, self.psi, self.v, self.cte, self.epsi]
    }
}

impl From<Vector6<f64>> for VehicleState {
    fn from(v: Vector6<f64>) -> Self {
        Self { x: v[0], y: v[1], psi: v[2], v: v[3], cte: v[4], epsi: v[5] }
    }
}

/// Result of one solve call: the next actuation command and the predicted
/// trajectory over the horizon, plus solver diagnostics.
#[derive(Debug, Clone)]
pub struct MpcSolution {
    /// next-step steering command [rad], within the actuator bounds
    pub steering: f64,
    /// next-step acceleration command [m/s^2], within the actuator bounds
    pub acceleration: f64,
    /// predicted x positions, one per horizon timestep [m]
    pub predicted_x: Vec<f64>,
    /// predicted y positions, one per horizon timestep [m]
    pub predicted_y: Vec<f64>,
    /// whether the solver reported convergence; a non-converged solution is
    /// still the best point found and may be usable by the caller's policy
    pub converged: bool,
    /// objective value at the returned point
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_state_roundtrip() {
        let state = VehicleState::new(1.0, -2.0, 0.1, 10.0, 0.5, -0.05);
        let back = VehicleState::from(state.to_vector());
        assert_eq!(state, back);
    }

    #[test]
    fn test_vehicle_state_array_order() {
        let state = VehicleState::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(state.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
