//! Solve orchestration
//!
//! Assembles the nonlinear program (decision vector, bounds, cost and
//! residual closures over the borrowed reference polynomial) and hands it to
//! the external solver, then slices the returned vector into the next
//! actuation command and the predicted trajectory.
//!
//! Equality constraints go through the solver's augmented-Lagrangian outer
//! loop: the residual mapping must land in the constraint-bound rectangle,
//! which is zero everywhere except the pinned timestep-0 state residuals.
//! A non-converged solve (including hitting the wall-clock budget) is
//! recoverable: the best point found is still returned and the caller's
//! policy decides what to do with it.

use log::{debug, warn};
use nalgebra::DVector;
use num_dual::Dual64;
use optimization_engine::alm::{
    AlmCache, AlmFactory, AlmOptimizer, AlmProblem, NO_JACOBIAN_MAPPING, NO_MAPPING,
};
use optimization_engine::constraints::{Ball2, Rectangle};
use optimization_engine::core::ExitStatus;
use optimization_engine::panoc::PANOCCache;
use optimization_engine::SolverError;

use crate::common::{MpcError, MpcResult, MpcSolution, VehicleState};

use super::autodiff;
use super::bounds::Bounds;
use super::config::MpcConfig;
use super::constraints;
use super::cost;
use super::layout::{Channel, VariableLayout};

/// Model predictive path tracking controller.
///
/// Immutable after construction; one instance may be shared across threads,
/// since every [`solve`](MpcController::solve) call builds its own working
/// vectors from scratch.
pub struct MpcController {
    config: MpcConfig,
    layout: VariableLayout,
}

impl MpcController {
    /// Validate the configuration and derive the variable layout from it.
    pub fn new(config: MpcConfig) -> MpcResult<Self> {
        config.validate()?;
        let layout = VariableLayout::new(config.horizon);
        Ok(MpcController { config, layout })
    }

    pub fn config(&self) -> &MpcConfig {
        &self.config
    }

    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    /// Compute the next actuation command for the current state against the
    /// reference polynomial (coefficients lowest degree first, borrowed for
    /// the duration of the call).
    ///
    /// Returns an error only for malformed inputs or a solver-level failure;
    /// mere non-convergence is reported through
    /// [`MpcSolution::converged`] after a logged warning.
    pub fn solve(&self, state: &VehicleState, coeffs: &DVector<f64>) -> MpcResult<MpcSolution> {
        if coeffs.len() < 2 {
            return Err(MpcError::InvalidReference(format!(
                "need at least 2 polynomial coefficients, got {}",
                coeffs.len()
            )));
        }

        let layout = &self.layout;
        let config = &self.config;
        let coeffs = coeffs.as_slice();

        // Decision vector: zero except the first-timestep state slice.
        let mut u = vec![0.0; layout.n_vars];
        for (&ch, &value) in Channel::STATES.iter().zip(state.to_array().iter()) {
            u[layout.index(ch, 0)] = value;
        }

        let bounds = Bounds::new(layout, config, state);

        let f = |u: &[f64], cost_value: &mut f64| -> Result<(), SolverError> {
            *cost_value = cost::total_cost(u, layout, config);
            Ok(())
        };
        let df = |u: &[f64], grad: &mut [f64]| -> Result<(), SolverError> {
            autodiff::gradient(
                |ud: &[Dual64]| cost::total_cost(ud, layout, config),
                u,
                grad,
            );
            Ok(())
        };
        let f1 = |u: &[f64], residuals: &mut [f64]| -> Result<(), SolverError> {
            constraints::residuals(u, residuals, coeffs, layout, config);
            Ok(())
        };
        let jf1t = |u: &[f64], d: &[f64], out: &mut [f64]| -> Result<(), SolverError> {
            autodiff::jacobian_transpose_product(
                |ud: &[Dual64], res: &mut [Dual64]| {
                    constraints::residuals(ud, res, coeffs, layout, config)
                },
                u,
                d,
                out,
                layout.n_constraints,
            );
            Ok(())
        };

        let set_c = Rectangle::new(
            Some(bounds.constraint_lower.as_slice()),
            Some(bounds.constraint_upper.as_slice()),
        );
        let factory = AlmFactory::new(
            f,
            df,
            Some(f1),
            Some(jf1t),
            NO_MAPPING,
            NO_JACOBIAN_MAPPING,
            Some(set_c),
            0,
        );

        let variable_bounds =
            Rectangle::new(Some(bounds.var_lower.as_slice()), Some(bounds.var_upper.as_slice()));
        let set_c = Rectangle::new(
            Some(bounds.constraint_lower.as_slice()),
            Some(bounds.constraint_upper.as_slice()),
        );
        let set_y = Ball2::new(None, 1e12);
        let problem = AlmProblem::new(
            variable_bounds,
            Some(set_c),
            Some(set_y),
            |u: &[f64], xi: &[f64], cost_value: &mut f64| -> Result<(), SolverError> {
                factory.psi(u, xi, cost_value)
            },
            |u: &[f64], xi: &[f64], grad: &mut [f64]| -> Result<(), SolverError> {
                factory.d_psi(u, xi, grad)
            },
            Some(f1),
            NO_MAPPING,
            layout.n_constraints,
            0,
        );

        let panoc_cache = PANOCCache::new(layout.n_vars, config.inner_tolerance, config.lbfgs_memory);
        let mut alm_cache = AlmCache::new(panoc_cache, layout.n_constraints, 0);
        let mut optimizer = AlmOptimizer::new(&mut alm_cache, problem)
            .with_delta_tolerance(config.constraint_tolerance)
            .with_epsilon_tolerance(config.inner_tolerance)
            .with_initial_inner_tolerance(config.inner_tolerance.max(1e-3))
            .with_max_outer_iterations(config.max_outer_iterations)
            .with_max_duration(config.max_solve_time);

        let status = optimizer.solve(&mut u).map_err(MpcError::from)?;

        let converged = matches!(status.exit_status(), ExitStatus::Converged);
        if converged {
            debug!(
                "mpc solve converged in {} outer iterations",
                status.num_outer_iterations()
            );
        } else {
            warn!(
                "mpc solve did not converge ({:?} after {} outer iterations), returning best point",
                status.exit_status(),
                status.num_outer_iterations()
            );
        }

        Ok(MpcSolution {
            steering: u[layout.steer_start],
            acceleration: u[layout.accel_start],
            predicted_x: u[layout.x_start..layout.y_start].to_vec(),
            predicted_y: u[layout.y_start..layout.psi_start].to_vec(),
            converged,
            cost: cost::total_cost(&u, layout, config),
        })
    }
}
