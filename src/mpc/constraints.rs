//! Equality-constraint residuals
//!
//! One residual per state variable per timestep. Timestep 0 exposes the raw
//! decision values, so bounding those residuals to the observed state pins
//! the start of the trajectory. Every later residual is the difference
//! between a decision value and its one-step prediction from the previous
//! timestep; driving all of them to zero forces the free variables into a
//! kinematically valid rollout.

use num_dual::DualNum;

use super::config::MpcConfig;
use super::kinematics::{step, BicycleState};
use super::layout::{Channel, VariableLayout};

/// Fill `out` (length `layout.n_constraints`) with the residuals of the
/// candidate decision vector `vars` against the reference polynomial.
pub fn residuals<D: DualNum<f64> + Copy>(
    vars: &[D],
    out: &mut [D],
    coeffs: &[f64],
    layout: &VariableLayout,
    config: &MpcConfig,
) {
    debug_assert_eq!(vars.len(), layout.n_vars);
    debug_assert_eq!(out.len(), layout.n_constraints);

    for &ch in Channel::STATES.iter() {
        let i = layout.index(ch, 0);
        out[i] = vars[i];
    }

    for t in 1..layout.horizon {
        let prev = BicycleState {
            x: vars[layout.x_start + t - 1],
            y: vars[layout.y_start + t - 1],
            psi: vars[layout.psi_start + t - 1],
            v: vars[layout.v_start + t - 1],
            cte: vars[layout.cte_start + t - 1],
            epsi: vars[layout.epsi_start + t - 1],
        };
        let steer = vars[layout.steer_start + t - 1];
        let accel = vars[layout.accel_start + t - 1];
        let pred = step(&prev, steer, accel, coeffs, config.lf, config.dt);

        out[layout.x_start + t] = vars[layout.x_start + t] - pred.x;
        out[layout.y_start + t] = vars[layout.y_start + t] - pred.y;
        out[layout.psi_start + t] = vars[layout.psi_start + t] - pred.psi;
        out[layout.v_start + t] = vars[layout.v_start + t] - pred.v;
        out[layout.cte_start + t] = vars[layout.cte_start + t] - pred.cte;
        out[layout.epsi_start + t] = vars[layout.epsi_start + t] - pred.epsi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (VariableLayout, MpcConfig) {
        let config = MpcConfig::default();
        (VariableLayout::new(config.horizon), config)
    }

    /// Roll the model forward from `initial` under the given constant
    /// actuation and write the states into a decision vector.
    fn rollout(
        initial: BicycleState<f64>,
        steer: f64,
        accel: f64,
        coeffs: &[f64],
        layout: &VariableLayout,
        config: &MpcConfig,
    ) -> Vec<f64> {
        let mut vars = vec![0.0; layout.n_vars];
        let mut state = initial;
        for t in 0..layout.horizon {
            vars[layout.x_start + t] = state.x;
            vars[layout.y_start + t] = state.y;
            vars[layout.psi_start + t] = state.psi;
            vars[layout.v_start + t] = state.v;
            vars[layout.cte_start + t] = state.cte;
            vars[layout.epsi_start + t] = state.epsi;
            if t < layout.horizon - 1 {
                vars[layout.steer_start + t] = steer;
                vars[layout.accel_start + t] = accel;
                state = step(&state, steer, accel, coeffs, config.lf, config.dt);
            }
        }
        vars
    }

    #[test]
    fn test_consistent_rollout_has_zero_residuals() {
        let (layout, config) = setup();
        let coeffs = [0.5, 0.2, -0.01];
        let initial = BicycleState { x: 0.0, y: 0.0, psi: 0.05, v: 12.0, cte: 0.5, epsi: -0.15 };
        let vars = rollout(initial, 0.02, 0.5, &coeffs, &layout, &config);

        let mut out = vec![0.0; layout.n_constraints];
        residuals(&vars, &mut out, &coeffs, &layout, &config);

        // Timestep 0 residuals are the raw decision values.
        assert!((out[layout.x_start] - initial.x).abs() < 1e-12);
        assert!((out[layout.v_start] - initial.v).abs() < 1e-12);
        assert!((out[layout.cte_start] - initial.cte).abs() < 1e-12);

        // Later residuals vanish on a model-consistent trajectory.
        for t in 1..layout.horizon {
            for &ch in Channel::STATES.iter() {
                assert!(
                    out[layout.index(ch, t)].abs() < 1e-9,
                    "residual for {:?} at t={} is {}",
                    ch,
                    t,
                    out[layout.index(ch, t)]
                );
            }
        }
    }

    #[test]
    fn test_perturbed_state_breaks_residual() {
        let (layout, config) = setup();
        let coeffs = [0.0, 0.0];
        let initial = BicycleState { x: 0.0, y: 0.0, psi: 0.0, v: 10.0, cte: 0.0, epsi: 0.0 };
        let mut vars = rollout(initial, 0.0, 0.0, &coeffs, &layout, &config);
        vars[layout.y_start + 4] += 0.3;

        let mut out = vec![0.0; layout.n_constraints];
        residuals(&vars, &mut out, &coeffs, &layout, &config);

        // The perturbed step itself and the error channel fed by y at the
        // next step are both violated.
        assert!((out[layout.y_start + 4] - 0.3).abs() < 1e-9);
        assert!(out[layout.cte_start + 5].abs() > 1e-3);
    }
}
