//! Decision-variable layout
//!
//! The solver works on a single flat vector holding every state variable
//! across the horizon followed by every actuation variable. The layout is the
//! one fixed bijection between named slices and flat indices; all index
//! arithmetic in the crate is derived from here so the variable vector and
//! its bound vectors can never disagree.

/// Named slices of the decision vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    X,
    Y,
    Psi,
    V,
    Cte,
    Epsi,
    Steer,
    Accel,
}

impl Channel {
    /// The six state channels, in layout order.
    pub const STATES: [Channel; 6] = [
        Channel::X,
        Channel::Y,
        Channel::Psi,
        Channel::V,
        Channel::Cte,
        Channel::Epsi,
    ];
}

/// Start offsets and totals for a horizon of `horizon` timesteps.
///
/// State slices have length `horizon`; the two actuation slices have length
/// `horizon - 1` since an actuation is applied between consecutive
/// timesteps. There is one constraint residual per state variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    pub horizon: usize,
    pub x_start: usize,
    pub y_start: usize,
    pub psi_start: usize,
    pub v_start: usize,
    pub cte_start: usize,
    pub epsi_start: usize,
    pub steer_start: usize,
    pub accel_start: usize,
    /// total decision-vector length: 6N + 2(N - 1)
    pub n_vars: usize,
    /// total residual count: 6N
    pub n_constraints: usize,
}

impl VariableLayout {
    pub fn new(horizon: usize) -> Self {
        let n = horizon;
        let x_start = 0;
        let y_start = x_start + n;
        let psi_start = y_start + n;
        let v_start = psi_start + n;
        let cte_start = v_start + n;
        let epsi_start = cte_start + n;
        let steer_start = epsi_start + n;
        let accel_start = steer_start + (n - 1);
        let n_vars = accel_start + (n - 1);
        VariableLayout {
            horizon: n,
            x_start,
            y_start,
            psi_start,
            v_start,
            cte_start,
            epsi_start,
            steer_start,
            accel_start,
            n_vars,
            n_constraints: steer_start,
        }
    }

    /// Flat index of `channel` at timestep `t`.
    pub fn index(&self, channel: Channel, t: usize) -> usize {
        let (start, len) = match channel {
            Channel::X => (self.x_start, self.horizon),
            Channel::Y => (self.y_start, self.horizon),
            Channel::Psi => (self.psi_start, self.horizon),
            Channel::V => (self.v_start, self.horizon),
            Channel::Cte => (self.cte_start, self.horizon),
            Channel::Epsi => (self.epsi_start, self.horizon),
            Channel::Steer => (self.steer_start, self.horizon - 1),
            Channel::Accel => (self.accel_start, self.horizon - 1),
        };
        debug_assert!(t < len, "timestep {} out of range for {:?}", t, channel);
        start + t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let layout = VariableLayout::new(12);
        assert_eq!(layout.n_vars, 6 * 12 + 2 * 11);
        assert_eq!(layout.n_constraints, 6 * 12);
    }

    #[test]
    fn test_slices_are_contiguous() {
        let layout = VariableLayout::new(12);
        assert_eq!(layout.x_start, 0);
        assert_eq!(layout.y_start, 12);
        assert_eq!(layout.psi_start, 24);
        assert_eq!(layout.v_start, 36);
        assert_eq!(layout.cte_start, 48);
        assert_eq!(layout.epsi_start, 60);
        assert_eq!(layout.steer_start, 72);
        assert_eq!(layout.accel_start, 72 + 11);
    }

    #[test]
    fn test_index_arithmetic() {
        let layout = VariableLayout::new(12);
        assert_eq!(layout.index(Channel::X, 0), 0);
        assert_eq!(layout.index(Channel::V, 3), layout.v_start + 3);
        assert_eq!(layout.index(Channel::Steer, 0), layout.steer_start);
        assert_eq!(layout.index(Channel::Accel, 10), layout.n_vars - 1);
    }

    #[test]
    fn test_state_channels_cover_constraints() {
        let layout = VariableLayout::new(5);
        let mut seen = vec![false; layout.n_constraints];
        for &ch in Channel::STATES.iter() {
            for t in 0..layout.horizon {
                seen[layout.index(ch, t)] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
