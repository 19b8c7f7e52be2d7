//! Cost function
//!
//! A single scalar objective accumulated over the horizon. Every squared
//! term is normalized by its expected scale before its weight is applied, so
//! retuning one weight never requires re-deriving a natural numeric scale
//! for the term.

use itertools::Itertools;
use num_dual::DualNum;

use super::config::MpcConfig;
use super::layout::VariableLayout;

/// Total cost of a candidate decision vector.
///
/// Terms:
/// - cross-track error, weighted more heavily at near-term timesteps
///   (weight `w_cte * (N - t)`) so the controller reduces error soonest
///   while still shaping the whole path;
/// - heading error at fixed weight;
/// - squared relative deviation of speed from the speed limit, which both
///   targets the limit and keeps the vehicle from stalling;
/// - steering and acceleration effort, normalized by the actuator maxima;
/// - consecutive-step steering and acceleration differences, normalized by a
///   typical per-step change, penalizing oscillation rather than magnitude.
pub fn total_cost<D: DualNum<f64> + Copy>(
    vars: &[D],
    layout: &VariableLayout,
    config: &MpcConfig,
) -> D {
    let n = layout.horizon;
    let speed_limit = config.speed_limit();
    let mut cost = D::from(0.0);

    for t in 0..n {
        let cte = vars[layout.cte_start + t] / config.std_cte;
        let epsi = vars[layout.epsi_start + t] / config.std_epsi;
        let dv = (vars[layout.v_start + t] - speed_limit) / speed_limit;
        cost = cost
            + cte.powi(2) * (config.w_cte * (n - t) as f64)
            + epsi.powi(2) * config.w_epsi
            + dv.powi(2) * config.w_speed;
    }

    let steer = &vars[layout.steer_start..layout.accel_start];
    let accel = &vars[layout.accel_start..layout.n_vars];

    for (&d, &a) in steer.iter().zip(accel.iter()) {
        cost = cost
            + (d / config.max_steer).powi(2) * config.w_steer
            + (a / config.max_accel).powi(2) * config.w_accel;
    }

    for (&d0, &d1) in steer.iter().tuple_windows() {
        cost = cost + ((d1 - d0) / config.std_dsteer).powi(2) * config.w_dsteer;
    }
    for (&a0, &a1) in accel.iter().tuple_windows() {
        cost = cost + ((a1 - a0) / config.std_daccel).powi(2) * config.w_daccel;
    }

    cost
}
