//! Channel generation.
//!
//! The optimizer treats the channel as an immutable input: one tensor is
//! generated per run and shared read-only by every fitness evaluation. This
//! module is that collaborator.

use ndarray::Array3;
use num_complex::Complex64;
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

/// Channel coefficients for the whole network, shape `(M, K, N)`.
///
/// `H[m, k, :]` is the channel vector from AP `m` to user `k`.
pub type ChannelTensor = Array3<Complex64>;

/// Generator of random channel realizations for an `(M, K, N)` system.
#[derive(Debug, Clone, Copy)]
pub struct ChannelModel {
    m: usize,
    k: usize,
    n: usize,
}

impl ChannelModel {
    /// Creates a generator for `m` APs, `k` users, and `n` antennas per AP.
    pub fn new(m: usize, k: usize, n: usize) -> ChannelModel {
        ChannelModel { m, k, n }
    }

    /// i.i.d. Rayleigh fading, NLOS.
    ///
    /// Entries are `(x + iy)/sqrt(2)` with `x, y` standard normal, so each
    /// coefficient has unit mean power: `E[|h|^2] = 1`.
    pub fn rayleigh(&self, rng: &mut dyn RngCore) -> ChannelTensor {
        Array3::from_shape_fn((self.m, self.k, self.n), |_| {
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            Complex64::new(re, im) * std::f64::consts::FRAC_1_SQRT_2
        })
    }

    /// Rayleigh fading with a random large-scale component.
    ///
    /// Each `(m, k)` link gets a shadowing factor drawn uniformly in
    /// [-10, 10] dB, applied as `sqrt(beta)` across that link's antennas.
    /// Models users at varying distances from the APs without committing to
    /// a geometry.
    pub fn with_pathloss(&self, rng: &mut dyn RngCore) -> ChannelTensor {
        let small_scale = self.rayleigh(rng);
        let beta = Array3::from_shape_fn((self.m, self.k, 1), |_| {
            let beta_db: f64 = rng.gen_range(-10.0..10.0);
            10f64.powf(beta_db / 10.0)
        });
        Array3::from_shape_fn((self.m, self.k, self.n), |(m, k, n)| {
            small_scale[[m, k, n]] * beta[[m, k, 0]].sqrt()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rayleigh_has_unit_mean_power() {
        let mut rng = StdRng::seed_from_u64(7);
        let h = ChannelModel::new(10, 10, 10).rayleigh(&mut rng);
        let mean_power: f64 = h.iter().map(|c| c.norm_sqr()).sum::<f64>() / 1000.0;
        assert!(
            (mean_power - 1.0).abs() < 0.15,
            "mean channel power {} should be close to 1",
            mean_power
        );
    }

    #[test]
    fn rayleigh_is_seed_deterministic() {
        let model = ChannelModel::new(3, 2, 4);
        let a = model.rayleigh(&mut StdRng::seed_from_u64(11));
        let b = model.rayleigh(&mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
        assert_eq!(a.dim(), (3, 2, 4));
    }

    #[test]
    fn pathloss_scales_whole_links() {
        let mut rng = StdRng::seed_from_u64(5);
        let h = ChannelModel::new(2, 2, 3).with_pathloss(&mut rng);
        assert_eq!(h.dim(), (2, 2, 3));
        assert!(h.iter().all(|c| c.norm_sqr().is_finite()));
    }
}
