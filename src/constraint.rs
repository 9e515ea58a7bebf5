//! Per-AP transmit power constraint.

use ndarray::Axis;

use crate::solution::WeightTensor;

/// Converts a power level in dBm to linear watts.
///
/// `P = 10^((dbm - 30) / 10)`; 30 dBm is 1 W.
pub fn dbm_to_watts(dbm: f64) -> f64 {
    10f64.powf((dbm - 30.0) / 10.0)
}

/// Projects solutions onto the feasible set of the per-AP power budget.
///
/// Each access point may radiate at most `p_max` watts, summed over all of
/// its `(user, antenna)` weights. APs under budget are left untouched; there
/// is no power floor.
#[derive(Debug, Clone, Copy)]
pub struct PowerConstraint {
    p_max_watts: f64,
}

impl PowerConstraint {
    /// Builds the constraint from a ceiling in dBm.
    ///
    /// The linear ceiling is always strictly positive, whatever the dBm
    /// value, so a zero-power ceiling cannot arise.
    pub fn from_dbm(p_max_dbm: f64) -> PowerConstraint {
        PowerConstraint {
            p_max_watts: dbm_to_watts(p_max_dbm),
        }
    }

    /// The linear power ceiling in watts.
    pub fn max_watts(&self) -> f64 {
        self.p_max_watts
    }

    /// Total radiated power of access point `m` under `w`.
    pub fn ap_power(w: &WeightTensor, m: usize) -> f64 {
        w.index_axis(Axis(0), m).iter().map(|c| c.norm_sqr()).sum()
    }

    /// Returns a copy of `w` scaled so every AP respects the ceiling.
    ///
    /// APs over budget are scaled by `sqrt(p_max / current)`, which lands
    /// them exactly on the ceiling; everything else passes through
    /// unchanged. The input is never mutated, and re-projecting a projected
    /// tensor is a no-op.
    pub fn project(&self, w: &WeightTensor) -> WeightTensor {
        let mut out = w.clone();
        for m in 0..w.dim().0 {
            let current = PowerConstraint::ap_power(w, m);
            if current > self.p_max_watts {
                let scale = (self.p_max_watts / current).sqrt();
                out.index_axis_mut(Axis(0), m).mapv_inplace(|c| c * scale);
            }
        }
        out
    }

    /// Whether every AP of `w` is within the ceiling, up to `eps`.
    pub fn is_satisfied(&self, w: &WeightTensor, eps: f64) -> bool {
        (0..w.dim().0).all(|m| PowerConstraint::ap_power(w, m) <= self.p_max_watts + eps)
    }
}
