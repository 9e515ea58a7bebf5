//! Candidate-generation rules.
//!
//! How a bee moves from a food source to a nearby one. The colony holds one
//! rule as a boxed [`Explore`] strategy; swapping the rule is what turns the
//! classic colony into the gbest-guided variant, with every phase left
//! untouched.
//!
//! All randomness comes through the caller's RNG, drawn entry by entry in
//! row-major order, so a fixed seed fixes the whole search trajectory.

use ndarray::Array3;
use rand::{Rng, RngCore};

use crate::candidate::Candidate;
use crate::solution::WeightTensor;

/// A rule for generating a trial solution near an existing one.
///
/// `field` is the population as it stood at the start of the phase, `index`
/// the member being worked on, `partner` a distinct member chosen by the
/// phase, and `best` the most recently memorized global best.
pub trait Explore: Send + Sync {
    /// Produces an unprojected trial tensor.
    fn explore(
        &self,
        field: &[Candidate],
        index: usize,
        partner: usize,
        best: &Candidate,
        rng: &mut dyn RngCore,
    ) -> WeightTensor;
}

/// Karaboga's original search move.
///
/// `v = x_i + phi (x_i - x_k)` with an independent `phi ~ U[-1, 1)` per
/// tensor entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicSearch;

impl Explore for ClassicSearch {
    fn explore(
        &self,
        field: &[Candidate],
        index: usize,
        partner: usize,
        _best: &Candidate,
        rng: &mut dyn RngCore,
    ) -> WeightTensor {
        let current = &field[index].weights;
        let other = &field[partner].weights;
        Array3::from_shape_fn(current.dim(), |idx| {
            let phi: f64 = rng.gen_range(-1.0..1.0);
            current[idx] + phi * (current[idx] - other[idx])
        })
    }
}

/// Gbest-guided search move (G-ABC).
///
/// Adds an attraction term toward the global best:
/// `v = x_i + phi (x_i - x_k) + psi (x_best - x_i)` with `phi ~ U[-1, 1)`
/// and `psi ~ U[0, psi_factor)` per entry.
#[derive(Debug, Clone, Copy)]
pub struct GbestSearch {
    psi_factor: f64,
}

impl GbestSearch {
    /// Creates the rule with the given attraction factor, typically in
    /// [0, 1.5].
    pub fn new(psi_factor: f64) -> GbestSearch {
        GbestSearch { psi_factor }
    }
}

impl Explore for GbestSearch {
    fn explore(
        &self,
        field: &[Candidate],
        index: usize,
        partner: usize,
        best: &Candidate,
        rng: &mut dyn RngCore,
    ) -> WeightTensor {
        // psi_factor of zero means no pull at all; draw nothing for psi so
        // the consumed RNG stream matches the classic rule exactly.
        if self.psi_factor == 0.0 {
            return ClassicSearch.explore(field, index, partner, best, rng);
        }
        let current = &field[index].weights;
        let other = &field[partner].weights;
        let target = &best.weights;
        Array3::from_shape_fn(current.dim(), |idx| {
            let phi: f64 = rng.gen_range(-1.0..1.0);
            let psi: f64 = rng.gen::<f64>() * self.psi_factor;
            current[idx] + phi * (current[idx] - other[idx]) + psi * (target[idx] - current[idx])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::random_weights;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field_of(count: usize, seed: u64) -> Vec<Candidate> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| Candidate::new(random_weights((2, 2, 2), &mut rng), 0.0))
            .collect()
    }

    #[test]
    fn identical_members_yield_identical_candidate() {
        // With x_i == x_k the difference term vanishes whatever phi is.
        let member = Candidate::new(random_weights((2, 2, 2), &mut StdRng::seed_from_u64(1)), 0.0);
        let field = vec![member.clone(), member.clone()];
        let best = member.clone();
        let mut rng = StdRng::seed_from_u64(2);
        let v = ClassicSearch.explore(&field, 0, 1, &best, &mut rng);
        assert_eq!(v, member.weights);
    }

    #[test]
    fn classic_is_seed_deterministic() {
        let field = field_of(3, 4);
        let best = field[0].clone();
        let a = ClassicSearch.explore(&field, 1, 2, &best, &mut StdRng::seed_from_u64(8));
        let b = ClassicSearch.explore(&field, 1, 2, &best, &mut StdRng::seed_from_u64(8));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_psi_matches_classic_bit_for_bit() {
        let field = field_of(4, 5);
        let best = field[3].clone();
        let classic = ClassicSearch.explore(&field, 0, 2, &best, &mut StdRng::seed_from_u64(21));
        let guided =
            GbestSearch::new(0.0).explore(&field, 0, 2, &best, &mut StdRng::seed_from_u64(21));
        assert_eq!(classic, guided);
    }

    #[test]
    fn positive_psi_changes_the_move() {
        let field = field_of(4, 6);
        let best = field[3].clone();
        let classic = ClassicSearch.explore(&field, 0, 2, &best, &mut StdRng::seed_from_u64(33));
        let guided =
            GbestSearch::new(1.0).explore(&field, 0, 2, &best, &mut StdRng::seed_from_u64(33));
        assert_ne!(classic, guided);
    }
}
