//! Solution representation.
//!
//! A solution is one complete beamforming assignment for the whole network:
//! a complex tensor indexed `(access point, user, antenna)`. Entry
//! `W[m, k, n]` is the weight AP `m` applies on antenna `n` for user `k`'s
//! signal.

use ndarray::Array3;
use num_complex::Complex64;
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

/// A complete beamforming solution, shape `(M, K, N)`.
///
/// Stored by value everywhere: population slots and the global best each own
/// their tensor, so mutating one can never retroactively change another.
pub type WeightTensor = Array3<Complex64>;

/// Draws a fresh random solution.
///
/// Real and imaginary parts of every entry are independent standard normals.
/// This is the distribution used both at initialization and by the scout
/// phase; callers are expected to project the result through the power
/// constraint before it becomes observable.
///
/// Entries are drawn in row-major order, so the consumed RNG stream is a
/// function of the shape alone.
pub fn random_weights(dim: (usize, usize, usize), rng: &mut dyn RngCore) -> WeightTensor {
    Array3::from_shape_fn(dim, |_| {
        let re: f64 = rng.sample(StandardNormal);
        let im: f64 = rng.sample(StandardNormal);
        Complex64::new(re, im)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shape_matches_request() {
        let mut rng = StdRng::seed_from_u64(1);
        let w = random_weights((3, 2, 4), &mut rng);
        assert_eq!(w.dim(), (3, 2, 4));
    }

    #[test]
    fn same_seed_same_tensor() {
        let a = random_weights((2, 2, 2), &mut StdRng::seed_from_u64(9));
        let b = random_weights((2, 2, 2), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn entries_are_spread_out() {
        let mut rng = StdRng::seed_from_u64(3);
        let w = random_weights((4, 4, 4), &mut rng);
        let mean_power: f64 = w.iter().map(|c| c.norm_sqr()).sum::<f64>() / 64.0;
        // E[|x + iy|^2] = 2 for standard-normal components.
        assert!(mean_power > 1.0 && mean_power < 3.0, "mean power {}", mean_power);
    }
}
