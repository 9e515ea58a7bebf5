#![warn(missing_docs)]

//! Artificial Bee Colony optimization of downlink beamforming for
//! cell-free networks.
//!
//! A cell-free network serves `K` single-antenna users from `M`
//! distributed access points with `N` antennas each. A solution is one
//! complex weight tensor of shape `(M, K, N)`; its quality is the
//! aggregate Shannon rate over all users, and every access point must
//! respect a transmit-power ceiling. The search space is non-convex and
//! complex-valued, so this crate optimizes it with a population-based
//! metaheuristic: Karaboga's Artificial Bee Colony, plus the gbest-guided
//! G-ABC variant that pulls candidates toward the best solution found so
//! far.
//!
//! The colony runs employed, onlooker, and scout phases over a population
//! of candidate tensors, projecting every candidate onto the power budget
//! and keeping improvements greedily. The search rule is a pluggable
//! [`Explore`] strategy ([`ClassicSearch`] or [`GbestSearch`]); all
//! randomness flows through a caller-supplied seedable RNG, so runs are
//! reproducible bit for bit, whatever
//! [`set_threads`](BeeColony::set_threads) says about evaluation
//! parallelism.
//!
//! # Examples
//!
//! ```
//! use cellfree_abc::{BeeColony, ChannelModel, Config};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let config = Config::from_yaml_str(
//!     "
//! system: { M: 2, K: 2, N: 2, p_max_dbm: 30.0, noise_power_dbm: -10.0, bandwidth: 1.0e6 }
//! algorithm: { pop_size: 10, max_cycle: 20, limit: 5, psi: 1.0 }
//! ",
//! )
//! .unwrap();
//!
//! // One immutable channel realization per run.
//! let channel = ChannelModel::new(2, 2, 2).rayleigh(&mut StdRng::seed_from_u64(7));
//!
//! let mut colony = BeeColony::gbest(&config, channel, StdRng::seed_from_u64(7)).unwrap();
//! let (best, trace) = colony.solve().unwrap();
//!
//! assert_eq!(trace.len(), 20);
//! assert!(best > 0.0);
//! // The global best never gets worse.
//! assert!(trace.windows(2).all(|w| w[1] >= w[0]));
//! ```
//!
//! Callers that want to render progress can drive the colony one phase or
//! one cycle at a time instead of calling [`BeeColony::solve`]; see
//! [`BeeColony::run_cycle`].

mod candidate;
mod channel;
mod colony;
mod config;
mod constraint;
mod explore;
mod metrics;
mod result;
mod solution;

pub mod scaling;

pub use candidate::{Candidate, WorkingCandidate};
pub use channel::{ChannelModel, ChannelTensor};
pub use colony::{BeeColony, ColonyState};
pub use config::{AlgorithmConfig, Config, SimulationConfig, SystemConfig};
pub use constraint::{dbm_to_watts, PowerConstraint};
pub use explore::{ClassicSearch, Explore, GbestSearch};
pub use metrics::SumRateEvaluator;
pub use result::{Error, Result};
pub use solution::{random_weights, WeightTensor};
