//! Selection pressure for the onlooker phase.
//!
//! Onlooker bees concentrate extra work on promising food sources. The
//! colony gathers the population's fitnesses, runs a [`ScalingFunction`]
//! over them, and picks members with probability proportional to the scaled
//! values:
//!
//! P(*i*) = scaled_i / sum_j scaled_j
//!
//! [`proportionate`] scaling (the raw sum rates) is the default. A custom
//! function can sharpen or flatten the pressure; it receives the fitness
//! vector by value and may mutate and return it to avoid an extra
//! allocation.
//!
//! Scaled totals that come out zero (an all-zero-rate population) or
//! negative do not panic: the colony falls back to choosing members
//! uniformly at random.

/// Transforms a fitness vector into onlooker selection weights.
pub type ScalingFunction = dyn Fn(Vec<f64>) -> Vec<f64> + Send + Sync + 'static;

/// Selects members in direct proportion to their sum rate.
pub fn proportionate() -> Box<ScalingFunction> {
    Box::new(|fitnesses| fitnesses)
}

/// Raises every fitness to the power `k`, exaggerating (`k > 1`) or
/// flattening (`k < 1`) differences between members.
pub fn power(k: f64) -> Box<ScalingFunction> {
    Box::new(move |mut fitnesses: Vec<f64>| {
        for f in &mut fitnesses {
            *f = f.powf(k);
        }
        fitnesses
    })
}

/// Selects by fitness rank instead of magnitude.
///
/// Members are ranked 1 (least fit) to N (fittest) and chosen in proportion
/// to their rank, which keeps selection pressure stable even when absolute
/// sum rates are nearly tied.
pub fn rank() -> Box<ScalingFunction> {
    Box::new(|fitnesses: Vec<f64>| {
        let mut order = (0..fitnesses.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| fitnesses[a].partial_cmp(&fitnesses[b]).unwrap());
        let mut ranks = vec![0.0; fitnesses.len()];
        for (position, &index) in order.iter().enumerate() {
            ranks[index] = (position + 1) as f64;
        }
        ranks
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportionate_is_identity() {
        let scaled = proportionate()(vec![1.0, 2.5, 0.0]);
        assert_eq!(scaled, vec![1.0, 2.5, 0.0]);
    }

    #[test]
    fn power_two_squares() {
        let scaled = power(2.0)(vec![1.0, 2.0, 3.0]);
        assert_eq!(scaled, vec![1.0, 4.0, 9.0]);
    }

    #[test]
    fn rank_orders_by_fitness() {
        let scaled = rank()(vec![0.3, 2.0, 1.1]);
        assert_eq!(scaled, vec![1.0, 3.0, 2.0]);
    }
}
