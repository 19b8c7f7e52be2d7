//! Kinematic bicycle model
//!
//! One forward-Euler step of the no-slip bicycle approximation, including
//! the cross-track / heading error recurrences measured against the
//! reference polynomial. Everything is generic over the scalar type `D` and
//! written as straight-line arithmetic with no branching on the variables,
//! so the same expressions evaluate with plain `f64` or with dual numbers
//! when the solver needs exact derivatives.

use num_dual::DualNum;

/// State channels of the bicycle model at one timestep.
#[derive(Debug, Clone, Copy)]
pub struct BicycleState<D> {
    pub x: D,
    pub y: D,
    pub psi: D,
    pub v: D,
    pub cte: D,
    pub epsi: D,
}

/// Evaluate a polynomial with coefficients ordered lowest degree first.
pub fn polyval<D: DualNum<f64> + Copy>(coeffs: &[f64], x: D) -> D {
    let mut result = D::from(0.0);
    for (i, &c) in coeffs.iter().enumerate() {
        result = result + x.powi(i as i32) * c;
    }
    result
}

/// Propagate the state one timestep of length `dt` under steering `steer`
/// and acceleration `accel`.
///
/// `coeffs` is the reference polynomial (at least two coefficients: the
/// desired heading is the arctangent of its linear coefficient, a slope
/// approximation at the origin of the ego frame). `lf` is the
/// front-axle-to-center-of-gravity distance.
pub fn step<D: DualNum<f64> + Copy>(
    prev: &BicycleState<D>,
    steer: D,
    accel: D,
    coeffs: &[f64],
    lf: f64,
    dt: f64,
) -> BicycleState<D> {
    let desired_y = polyval(coeffs, prev.x);
    let desired_psi = coeffs[1].atan();

    // Heading change over the step; shared by the psi and epsi channels.
    let dpsi = prev.v * steer * (dt / lf);

    BicycleState {
        x: prev.x + prev.v * prev.psi.cos() * dt,
        y: prev.y + prev.v * prev.psi.sin() * dt,
        psi: prev.psi + dpsi,
        v: prev.v + accel * dt,
        cte: (desired_y - prev.y) + prev.v * prev.epsi.sin() * dt,
        epsi: (prev.psi - desired_psi) + dpsi,
    }
}
