//! The bee colony: population state plus the four-phase search loop.
//!
//! One [`BeeColony`] owns everything a run needs: the immutable channel,
//! the evaluator and power constraint, the seedable RNG, the search rule,
//! and the population itself. Construction performs initialization, so a
//! colony is ready to be stepped or solved the moment it exists and no
//! unconstrained solution is ever observable.
//!
//! Phases use phase-start snapshot semantics: every candidate of a phase is
//! generated from the population as it stood when the phase began, all
//! random draws happen serially up front, and greedy write-back is applied
//! serially in draw order. Evaluation of the drawn batch may fan out over
//! scoped threads ([`BeeColony::set_threads`]); results are bit-identical
//! for any thread count.

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::Rng;

use crate::candidate::{Candidate, WorkingCandidate};
use crate::channel::ChannelTensor;
use crate::config::Config;
use crate::constraint::PowerConstraint;
use crate::explore::{ClassicSearch, Explore, GbestSearch};
use crate::metrics::SumRateEvaluator;
use crate::result::{Error, Result};
use crate::scaling::{self, ScalingFunction};
use crate::solution::{random_weights, WeightTensor};

/// Cycles between progress log lines in [`BeeColony::solve`].
const PROGRESS_EVERY: usize = 10;

/// The population and the best solution observed so far.
pub struct ColonyState {
    members: Vec<WorkingCandidate>,
    best: Candidate,
}

impl ColonyState {
    /// The population slots, in index order.
    pub fn members(&self) -> &[WorkingCandidate] {
        &self.members
    }

    /// The global best: highest-fitness candidate observed across the run.
    ///
    /// Always a deep copy of the population member it came from; later
    /// mutation of that slot cannot touch it.
    pub fn best(&self) -> &Candidate {
        &self.best
    }

    /// Current fitness of every member, in index order.
    pub fn fitnesses(&self) -> Vec<f64> {
        self.members.iter().map(|m| m.candidate.fitness).collect()
    }
}

/// Artificial Bee Colony optimizer over beamforming weight tensors.
///
/// The variant (classic ABC vs gbest-guided G-ABC) is chosen by the
/// [`Explore`] rule supplied at construction; every phase is shared.
pub struct BeeColony {
    pop_size: usize,
    max_cycle: usize,
    limit: u32,
    constraint: PowerConstraint,
    evaluator: SumRateEvaluator,
    channel: ChannelTensor,
    search: Box<dyn Explore>,
    scale: Box<ScalingFunction>,
    threads: usize,
    rng: StdRng,
    state: ColonyState,
    trace: Vec<f64>,
}

impl BeeColony {
    /// Builds a colony using Karaboga's original search rule.
    pub fn classic(config: &Config, channel: ChannelTensor, rng: StdRng) -> Result<BeeColony> {
        BeeColony::with_search(config, channel, rng, Box::new(ClassicSearch))
    }

    /// Builds a gbest-guided colony (G-ABC); `psi` comes from the config.
    pub fn gbest(config: &Config, channel: ChannelTensor, rng: StdRng) -> Result<BeeColony> {
        let psi = config.algorithm.psi;
        BeeColony::with_search(config, channel, rng, Box::new(GbestSearch::new(psi)))
    }

    /// Builds a colony around a caller-supplied search rule.
    ///
    /// Validates the configuration, checks the channel tensor against the
    /// configured `(M, K, N)`, and initializes the population: `pop_size`
    /// standard-normal tensors, each projected and evaluated before it
    /// becomes visible, with the best deep-copied into the global best.
    pub fn with_search(
        config: &Config,
        channel: ChannelTensor,
        mut rng: StdRng,
        search: Box<dyn Explore>,
    ) -> Result<BeeColony> {
        config.validate()?;
        let expected = config.dims();
        if channel.dim() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                found: channel.dim(),
            });
        }
        let constraint = PowerConstraint::from_dbm(config.system.p_max_dbm);
        let evaluator = SumRateEvaluator::from_config(&config.system);

        let mut members = Vec::with_capacity(config.algorithm.pop_size);
        for _ in 0..config.algorithm.pop_size {
            let weights = constraint.project(&random_weights(expected, &mut rng));
            let fitness = evaluator.sum_rate(&weights, &channel)?;
            members.push(WorkingCandidate::fresh(Candidate::new(weights, fitness)));
        }
        let best_index = members
            .iter()
            .map(|m| m.candidate.fitness)
            .position_max_by(|a, b| a.partial_cmp(b).unwrap())
            .unwrap_or(0);
        let best = members[best_index].candidate.clone();

        Ok(BeeColony {
            pop_size: config.algorithm.pop_size,
            max_cycle: config.algorithm.max_cycle,
            limit: config.algorithm.limit,
            constraint,
            evaluator,
            channel,
            search,
            scale: scaling::proportionate(),
            threads: num_cpus::get(),
            rng,
            state: ColonyState { members, best },
            trace: Vec::new(),
        })
    }

    /// Sets the number of threads used to evaluate each phase's candidate
    /// batch. `1` evaluates inline. Has no effect on results.
    pub fn set_threads(mut self, threads: usize) -> BeeColony {
        self.threads = threads.max(1);
        self
    }

    /// Replaces the onlooker selection-pressure scaling
    /// (default: [`scaling::proportionate`]).
    pub fn set_scaling(mut self, scale: Box<ScalingFunction>) -> BeeColony {
        self.scale = scale;
        self
    }

    /// Employed-bees phase: one search move per population index.
    ///
    /// For every `i`, a partner `k != i` is drawn uniformly, a candidate is
    /// generated, projected, and evaluated, and greedy selection replaces
    /// slot `i` only on strict improvement (resetting its counter); failure
    /// increments the counter.
    pub fn employed_bees_phase(&mut self) -> Result<()> {
        let field = self.snapshot();
        let mut trials = Vec::with_capacity(self.pop_size);
        for i in 0..self.pop_size {
            let partner = self.pick_partner(i);
            let v = self
                .search
                .explore(&field, i, partner, &self.state.best, &mut self.rng);
            trials.push(self.constraint.project(&v));
        }
        let fitnesses = self.evaluate_batch(&trials)?;
        for (i, (weights, fitness)) in trials.into_iter().zip(fitnesses).enumerate() {
            self.greedy_select(i, weights, fitness);
        }
        Ok(())
    }

    /// Onlooker-bees phase: `pop_size` fitness-biased search moves.
    ///
    /// Selection probabilities are computed once from the phase-start
    /// fitnesses (scaled by the configured [`ScalingFunction`]); indices are
    /// drawn with replacement, then each draw performs the same
    /// generate/project/evaluate/greedy-select step as the employed phase.
    pub fn onlooker_bees_phase(&mut self) -> Result<()> {
        let field = self.snapshot();
        let scaled = (self.scale)(field.iter().map(|c| c.fitness).collect());
        let cumulative: Vec<f64> = scaled
            .iter()
            .scan(0.0, |acc, &w| {
                *acc += w;
                Some(*acc)
            })
            .collect();

        let mut targets = Vec::with_capacity(self.pop_size);
        let mut trials = Vec::with_capacity(self.pop_size);
        for _ in 0..self.pop_size {
            let i = self.roulette(&cumulative);
            let partner = self.pick_partner(i);
            let v = self
                .search
                .explore(&field, i, partner, &self.state.best, &mut self.rng);
            targets.push(i);
            trials.push(self.constraint.project(&v));
        }
        let fitnesses = self.evaluate_batch(&trials)?;
        for ((i, weights), fitness) in targets.into_iter().zip(trials).zip(fitnesses) {
            self.greedy_select(i, weights, fitness);
        }
        Ok(())
    }

    /// Scout-bees phase: resamples every member stagnant past `limit`.
    ///
    /// Replacements are drawn from the initialization distribution,
    /// projected, evaluated, and installed with their counter back at zero.
    /// Members at or below the limit are untouched.
    pub fn scout_bees_phase(&mut self) -> Result<()> {
        let dim = self.channel.dim();
        let mut targets = Vec::new();
        let mut fresh = Vec::new();
        for i in 0..self.pop_size {
            if self.state.members[i].stagnant(self.limit) {
                let v = random_weights(dim, &mut self.rng);
                targets.push(i);
                fresh.push(self.constraint.project(&v));
            }
        }
        if targets.is_empty() {
            return Ok(());
        }
        log::debug!("scout phase resampled {} stagnant member(s)", targets.len());
        let fitnesses = self.evaluate_batch(&fresh)?;
        for ((i, weights), fitness) in targets.into_iter().zip(fresh).zip(fitnesses) {
            self.state.members[i] = WorkingCandidate::fresh(Candidate::new(weights, fitness));
        }
        Ok(())
    }

    /// Memorize step: promotes the population's best into the global best on
    /// strict improvement, then appends the (possibly unchanged) global-best
    /// fitness to the convergence trace.
    pub fn memorize_best_solution(&mut self) {
        let challenger = self
            .state
            .members
            .iter()
            .map(|m| m.candidate.fitness)
            .position_max_by(|a, b| a.partial_cmp(b).unwrap());
        if let Some(i) = challenger {
            let candidate = &self.state.members[i].candidate;
            if candidate.fitness > self.state.best.fitness {
                self.state.best = candidate.clone();
            }
        }
        self.trace.push(self.state.best.fitness);
    }

    /// One full cycle: employed, onlooker, scout, memorize.
    ///
    /// Step-driving callers (live renderers and the like) can call this —
    /// or the four phases individually — and read
    /// [`best_fitness`](BeeColony::best_fitness) /
    /// [`best_solution`](BeeColony::best_solution) between steps.
    pub fn run_cycle(&mut self) -> Result<()> {
        self.employed_bees_phase()?;
        self.onlooker_bees_phase()?;
        self.scout_bees_phase()?;
        self.memorize_best_solution();
        Ok(())
    }

    /// Runs `max_cycle` cycles and returns the best fitness together with
    /// the per-cycle convergence trace.
    pub fn solve(&mut self) -> Result<(f64, Vec<f64>)> {
        for cycle in 0..self.max_cycle {
            self.run_cycle()?;
            if (cycle + 1) % PROGRESS_EVERY == 0 {
                log::info!(
                    "cycle {}/{}: best sum rate {:.4} bit/s/Hz",
                    cycle + 1,
                    self.max_cycle,
                    self.best_fitness()
                );
            }
        }
        Ok((self.best_fitness(), self.trace.clone()))
    }

    /// Fitness of the best solution observed so far.
    pub fn best_fitness(&self) -> f64 {
        self.state.best.fitness
    }

    /// The best solution observed so far.
    pub fn best_solution(&self) -> &WeightTensor {
        &self.state.best.weights
    }

    /// Global-best fitness after each completed cycle, oldest first.
    pub fn convergence_curve(&self) -> &[f64] {
        &self.trace
    }

    /// The population and global best, for inspection.
    pub fn state(&self) -> &ColonyState {
        &self.state
    }

    /// The power constraint the colony projects through.
    pub fn constraint(&self) -> &PowerConstraint {
        &self.constraint
    }

    fn snapshot(&self) -> Vec<Candidate> {
        self.state
            .members
            .iter()
            .map(|m| m.candidate.clone())
            .collect()
    }

    fn pick_partner(&mut self, index: usize) -> usize {
        let mut partner = self.rng.gen_range(0..self.pop_size - 1);
        if partner >= index {
            partner += 1;
        }
        partner
    }

    /// Strict improvement replaces the slot; anything else ages it.
    fn greedy_select(&mut self, index: usize, weights: WeightTensor, fitness: f64) {
        let slot = &mut self.state.members[index];
        if fitness > slot.candidate.fitness {
            slot.replace(Candidate::new(weights, fitness));
        } else {
            slot.mark_stale();
        }
    }

    /// Roulette choice over cumulative selection weights.
    ///
    /// A non-positive total carries no pressure, so the choice degrades to
    /// uniform instead of dividing by zero.
    fn roulette(&mut self, cumulative: &[f64]) -> usize {
        let total = cumulative.last().copied().unwrap_or(0.0);
        if total <= 0.0 {
            return self.rng.gen_range(0..self.pop_size);
        }
        let point = self.rng.gen::<f64>() * total;
        for (i, &edge) in cumulative.iter().enumerate() {
            if edge > point {
                return i;
            }
        }
        unreachable!();
    }

    /// Evaluates a batch of projected candidates, in order.
    ///
    /// With more than one thread the batch is chunked over a crossbeam
    /// scope; a panicking worker surfaces as [`Error::WorkerPanic`].
    fn evaluate_batch(&self, batch: &[WeightTensor]) -> Result<Vec<f64>> {
        if self.threads <= 1 || batch.len() < 2 {
            return batch
                .iter()
                .map(|w| self.evaluator.sum_rate(w, &self.channel))
                .collect();
        }
        let chunk_len = (batch.len() + self.threads - 1) / self.threads;
        let evaluator = &self.evaluator;
        let channel = &self.channel;
        let joined = crossbeam::thread::scope(|scope| {
            let handles = batch
                .chunks(chunk_len)
                .map(|chunk| {
                    scope.spawn(move |_| {
                        chunk
                            .iter()
                            .map(|w| evaluator.sum_rate(w, channel))
                            .collect::<Result<Vec<f64>>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| Error::WorkerPanic)?;

        let mut fitnesses = Vec::with_capacity(batch.len());
        for result in joined {
            fitnesses.extend(result.map_err(|_| Error::WorkerPanic)??);
        }
        Ok(fitnesses)
    }
}
