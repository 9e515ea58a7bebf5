//! Sum-rate fitness.
//!
//! The objective the colony maximizes: aggregate downlink spectral
//! efficiency over all users, in bit/s/Hz. Every user hears a coherent
//! combination from all APs of its own signal (desired) and of every other
//! user's signal (interference); Shannon's formula turns the resulting SINR
//! into a rate.

use ndarray::{s, ArrayView1};
use num_complex::Complex64;

use crate::channel::ChannelTensor;
use crate::config::SystemConfig;
use crate::constraint::dbm_to_watts;
use crate::result::{Error, Result};
use crate::solution::WeightTensor;

/// Computes the sum rate of a weight tensor under a fixed channel.
#[derive(Debug, Clone, Copy)]
pub struct SumRateEvaluator {
    bandwidth: f64,
    noise_power: f64,
}

impl SumRateEvaluator {
    /// Creates an evaluator from a bandwidth in Hz and a noise power in dBm.
    pub fn new(bandwidth: f64, noise_power_dbm: f64) -> SumRateEvaluator {
        SumRateEvaluator {
            bandwidth,
            noise_power: dbm_to_watts(noise_power_dbm),
        }
    }

    /// Creates an evaluator from the system section of a [`crate::Config`].
    pub fn from_config(system: &SystemConfig) -> SumRateEvaluator {
        SumRateEvaluator::new(system.bandwidth, system.noise_power_dbm)
    }

    /// System bandwidth in Hz. Rates are reported per Hz; multiply by this
    /// to get bit/s.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Linear noise power in watts.
    pub fn noise_power(&self) -> f64 {
        self.noise_power
    }

    /// Hermitian inner product, conjugate-linear in the channel argument.
    fn vdot(h: ArrayView1<'_, Complex64>, w: ArrayView1<'_, Complex64>) -> Complex64 {
        h.iter().zip(w.iter()).map(|(h, w)| h.conj() * w).sum()
    }

    /// SINR of user `k`. Shapes are checked by the public callers.
    fn sinr(&self, w: &WeightTensor, h: &ChannelTensor, k: usize) -> f64 {
        let (num_aps, num_users, _) = h.dim();

        // Desired signal: coherent sum over APs of <h_mk, w_mk>.
        let desired: Complex64 = (0..num_aps)
            .map(|m| SumRateEvaluator::vdot(h.slice(s![m, k, ..]), w.slice(s![m, k, ..])))
            .sum();
        let signal = desired.norm_sqr();

        // Interference: user k hears the beams aimed at every j != k
        // through its own channel.
        let mut interference = 0.0;
        for j in 0..num_users {
            if j == k {
                continue;
            }
            let leaked: Complex64 = (0..num_aps)
                .map(|m| SumRateEvaluator::vdot(h.slice(s![m, k, ..]), w.slice(s![m, j, ..])))
                .sum();
            interference += leaked.norm_sqr();
        }

        signal / (interference + self.noise_power)
    }

    fn check_shapes(w: &WeightTensor, h: &ChannelTensor) -> Result<()> {
        if w.dim() != h.dim() {
            return Err(Error::ShapeMismatch {
                expected: h.dim(),
                found: w.dim(),
            });
        }
        Ok(())
    }

    /// Per-user spectral efficiencies `log2(1 + SINR_k)` in bit/s/Hz.
    pub fn per_user_rates(&self, w: &WeightTensor, h: &ChannelTensor) -> Result<Vec<f64>> {
        SumRateEvaluator::check_shapes(w, h)?;
        Ok((0..h.dim().1)
            .map(|k| (1.0 + self.sinr(w, h, k)).log2())
            .collect())
    }

    /// Aggregate spectral efficiency in bit/s/Hz. The colony's fitness.
    ///
    /// Never negative: every user contributes `log2(1 + SINR_k) >= 0`.
    pub fn sum_rate(&self, w: &WeightTensor, h: &ChannelTensor) -> Result<f64> {
        SumRateEvaluator::check_shapes(w, h)?;
        Ok((0..h.dim().1)
            .map(|k| (1.0 + self.sinr(w, h, k)).log2())
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;

    fn scalar_tensor(value: Complex64) -> Array3<Complex64> {
        Array3::from_elem((1, 1, 1), value)
    }

    #[test]
    fn single_link_matches_closed_form() {
        // One AP, one user, one antenna, noise of exactly 1 W (30 dBm):
        // rate = log2(1 + |conj(h) * w|^2).
        let evaluator = SumRateEvaluator::new(1.0e6, 30.0);
        let h = scalar_tensor(Complex64::new(0.0, 1.0));
        let w = scalar_tensor(Complex64::new(2.0, 0.0));
        let rate = evaluator.sum_rate(&w, &h).unwrap();
        assert_relative_eq!(rate, 5.0f64.log2(), epsilon = 1e-12);
    }

    #[test]
    fn rate_is_monotone_in_noise() {
        let h = scalar_tensor(Complex64::new(1.0, 0.5));
        let w = scalar_tensor(Complex64::new(0.7, -0.2));
        let quiet = SumRateEvaluator::new(1.0, -90.0).sum_rate(&w, &h).unwrap();
        let noisy = SumRateEvaluator::new(1.0, -60.0).sum_rate(&w, &h).unwrap();
        assert!(quiet > noisy);
    }

    #[test]
    fn rate_is_monotone_in_signal() {
        // Two users; user 1's beam (the interference seen by user 0) is held
        // fixed while user 0's own beam grows.
        let evaluator = SumRateEvaluator::new(1.0, 0.0);
        let mut h = Array3::from_elem((1, 2, 1), Complex64::new(1.0, 0.0));
        h[[0, 1, 0]] = Complex64::new(0.5, 0.5);
        let mut weak = Array3::from_elem((1, 2, 1), Complex64::new(0.3, 0.0));
        let mut strong = weak.clone();
        weak[[0, 0, 0]] = Complex64::new(1.0, 0.0);
        strong[[0, 0, 0]] = Complex64::new(2.0, 0.0);

        let rate_weak = evaluator.per_user_rates(&weak, &h).unwrap()[0];
        let rate_strong = evaluator.per_user_rates(&strong, &h).unwrap()[0];
        assert!(rate_strong > rate_weak);
    }

    #[test]
    fn rate_is_monotone_in_interference() {
        // User 0's own beam is held fixed while user 1's beam (interference
        // at user 0) grows.
        let evaluator = SumRateEvaluator::new(1.0, 0.0);
        let h = Array3::from_elem((1, 2, 1), Complex64::new(1.0, 0.0));
        let mut calm = Array3::from_elem((1, 2, 1), Complex64::new(1.0, 0.0));
        let mut loud = calm.clone();
        calm[[0, 1, 0]] = Complex64::new(0.1, 0.0);
        loud[[0, 1, 0]] = Complex64::new(2.0, 0.0);

        let rate_calm = evaluator.per_user_rates(&calm, &h).unwrap()[0];
        let rate_loud = evaluator.per_user_rates(&loud, &h).unwrap()[0];
        assert!(rate_calm > rate_loud);
    }

    #[test]
    fn sum_rate_is_sum_of_user_rates() {
        let evaluator = SumRateEvaluator::new(1.0, -10.0);
        let h = Array3::from_shape_fn((2, 3, 2), |(m, k, n)| {
            Complex64::new((m + k) as f64 * 0.3, n as f64 * 0.2 - 0.1)
        });
        let w = Array3::from_shape_fn((2, 3, 2), |(m, k, n)| {
            Complex64::new(0.2 - m as f64 * 0.1, (k * n) as f64 * 0.15)
        });
        let total = evaluator.sum_rate(&w, &h).unwrap();
        let by_user: f64 = evaluator.per_user_rates(&w, &h).unwrap().iter().sum();
        assert_relative_eq!(total, by_user, epsilon = 1e-12);
        assert!(total >= 0.0);
    }

    #[test]
    fn shape_mismatch_is_fatal() {
        let evaluator = SumRateEvaluator::new(1.0, 0.0);
        let h = Array3::from_elem((2, 2, 2), Complex64::new(1.0, 0.0));
        let w = Array3::from_elem((2, 2, 3), Complex64::new(1.0, 0.0));
        assert!(matches!(
            evaluator.sum_rate(&w, &h),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
