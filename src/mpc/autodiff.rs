//! Forward-mode derivative helpers
//!
//! The cost and residual expressions are generic over the scalar type, so
//! exact first derivatives come from evaluating them with dual numbers: seed
//! the dual part of one coordinate, evaluate, and read the derivative back
//! from the dual part of the result. One evaluation per coordinate.

use num_dual::Dual64;

/// Gradient of the scalar function `f` at `u`, written into `grad`.
pub fn gradient<F>(f: F, u: &[f64], grad: &mut [f64])
where
    F: Fn(&[Dual64]) -> Dual64,
{
    debug_assert_eq!(u.len(), grad.len());
    let mut duals: Vec<Dual64> = u.iter().map(|&v| Dual64::from(v)).collect();
    for i in 0..u.len() {
        duals[i].eps = 1.0;
        grad[i] = f(&duals).eps;
        duals[i].eps = 0.0;
    }
}

/// Product of the transposed Jacobian of the vector function `f` with the
/// direction `d`, written into `out` (one entry per coordinate of `u`).
///
/// Computed as the gradient of `u -> f(u) . d`, which needs the same single
/// dual sweep as [`gradient`] instead of the full Jacobian.
pub fn jacobian_transpose_product<F>(
    f: F,
    u: &[f64],
    d: &[f64],
    out: &mut [f64],
    n_residuals: usize,
) where
    F: Fn(&[Dual64], &mut [Dual64]),
{
    debug_assert_eq!(u.len(), out.len());
    debug_assert_eq!(d.len(), n_residuals);
    let mut duals: Vec<Dual64> = u.iter().map(|&v| Dual64::from(v)).collect();
    let mut residuals = vec![Dual64::from(0.0); n_residuals];
    for i in 0..u.len() {
        duals[i].eps = 1.0;
        f(&duals, &mut residuals);
        out[i] = residuals
            .iter()
            .zip(d.iter())
            .map(|(r, &w)| r.eps * w)
            .sum();
        duals[i].eps = 0.0;
    }
}
