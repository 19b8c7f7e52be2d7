//! Variable and constraint bounds
//!
//! Built once per solve call, sharing the layout's index arithmetic with the
//! decision vector so the two can never disagree. Positions, headings and
//! error channels are unbounded; speed is limited to the configured speed
//! limit in both directions; the actuation slices carry the actuator limits.
//! Constraint residuals are bounded to exactly zero, except the timestep-0
//! state residuals whose bounds are set to the observed state, which is what
//! pins the start of the trajectory.

use crate::common::VehicleState;

use super::config::MpcConfig;
use super::layout::{Channel, VariableLayout};

/// Lower/upper limits for the decision variables and constraint residuals
/// of one solve call.
#[derive(Debug, Clone)]
pub struct Bounds {
    pub var_lower: Vec<f64>,
    pub var_upper: Vec<f64>,
    pub constraint_lower: Vec<f64>,
    pub constraint_upper: Vec<f64>,
}

impl Bounds {
    pub fn new(layout: &VariableLayout, config: &MpcConfig, state: &VehicleState) -> Self {
        let mut var_lower = vec![f64::NEG_INFINITY; layout.n_vars];
        let mut var_upper = vec![f64::INFINITY; layout.n_vars];

        let speed_limit = config.speed_limit();
        for i in layout.v_start..layout.cte_start {
            var_lower[i] = -speed_limit; // reverse driving
            var_upper[i] = speed_limit;
        }
        for i in layout.steer_start..layout.accel_start {
            var_lower[i] = -config.max_steer;
            var_upper[i] = config.max_steer;
        }
        for i in layout.accel_start..layout.n_vars {
            var_lower[i] = -config.max_accel; // full braking
            var_upper[i] = config.max_accel;
        }

        let mut constraint_lower = vec![0.0; layout.n_constraints];
        let mut constraint_upper = vec![0.0; layout.n_constraints];
        for (&ch, &value) in Channel::STATES.iter().zip(state.to_array().iter()) {
            let i = layout.index(ch, 0);
            constraint_lower[i] = value;
            constraint_upper[i] = value;
        }

        Bounds { var_lower, var_upper, constraint_lower, constraint_upper }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (VariableLayout, MpcConfig, VehicleState) {
        let config = MpcConfig::default();
        let layout = VariableLayout::new(config.horizon);
        let state = VehicleState::new(1.0, -0.5, 0.1, 20.0, 0.8, -0.02);
        (layout, config, state)
    }

    #[test]
    fn test_state_variables_are_unbounded() {
        let (layout, config, state) = setup();
        let bounds = Bounds::new(&layout, &config, &state);
        for i in layout.x_start..layout.v_start {
            assert_eq!(bounds.var_lower[i], f64::NEG_INFINITY);
            assert_eq!(bounds.var_upper[i], f64::INFINITY);
        }
        for i in layout.cte_start..layout.steer_start {
            assert_eq!(bounds.var_lower[i], f64::NEG_INFINITY);
            assert_eq!(bounds.var_upper[i], f64::INFINITY);
        }
    }

    #[test]
    fn test_speed_bounds_use_converted_limit() {
        let (layout, config, state) = setup();
        let bounds = Bounds::new(&layout, &config, &state);
        for i in layout.v_start..layout.cte_start {
            assert_eq!(bounds.var_upper[i], config.speed_limit());
            assert_eq!(bounds.var_lower[i], -config.speed_limit());
        }
    }

    #[test]
    fn test_actuator_bounds() {
        let (layout, config, state) = setup();
        let bounds = Bounds::new(&layout, &config, &state);
        for i in layout.steer_start..layout.accel_start {
            assert_eq!(bounds.var_lower[i], -config.max_steer);
            assert_eq!(bounds.var_upper[i], config.max_steer);
        }
        for i in layout.accel_start..layout.n_vars {
            assert_eq!(bounds.var_lower[i], -config.max_accel);
            assert_eq!(bounds.var_upper[i], config.max_accel);
        }
    }

    #[test]
    fn test_initial_state_is_pinned() {
        let (layout, config, state) = setup();
        let bounds = Bounds::new(&layout, &config, &state);
        let expected = state.to_array();
        for (&ch, &value) in Channel::STATES.iter().zip(expected.iter()) {
            let i = layout.index(ch, 0);
            assert_eq!(bounds.constraint_lower[i], value);
            assert_eq!(bounds.constraint_upper[i], value);
        }
        // All other residuals must be exactly zero.
        for t in 1..layout.horizon {
            for &ch in Channel::STATES.iter() {
                let i = layout.index(ch, t);
                assert_eq!(bounds.constraint_lower[i], 0.0);
                assert_eq!(bounds.constraint_upper[i], 0.0);
            }
        }
    }
}
