use crate::solution::WeightTensor;

/// One solution plus its cached fitness.
///
/// Fitness evaluation is the expensive step of the search, so it happens
/// exactly once per tensor and travels with it from then on.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// The beamforming solution.
    pub weights: WeightTensor,
    /// Cached sum rate of `weights`, in bit/s/Hz.
    pub fitness: f64,
}

impl Candidate {
    /// Pairs an already-evaluated solution with its fitness.
    pub fn new(weights: WeightTensor, fitness: f64) -> Candidate {
        Candidate { weights, fitness }
    }
}

/// A population slot: a candidate plus its stagnation counter.
#[derive(Clone, Debug)]
pub struct WorkingCandidate {
    /// The slot's current candidate.
    pub candidate: Candidate,
    trials: u32,
}

impl WorkingCandidate {
    /// Wraps a freshly generated candidate with a zeroed counter.
    pub fn fresh(candidate: Candidate) -> WorkingCandidate {
        WorkingCandidate {
            candidate,
            trials: 0,
        }
    }

    /// Consecutive phases in which this slot failed to improve.
    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Whether the slot has stagnated past `limit` and should be scouted.
    pub fn stagnant(&self, limit: u32) -> bool {
        self.trials > limit
    }

    /// Records one more failed improvement attempt.
    pub fn mark_stale(&mut self) {
        self.trials += 1;
    }

    /// Installs an improved candidate and restarts the count.
    pub fn replace(&mut self, candidate: Candidate) {
        self.candidate = candidate;
        self.trials = 0;
    }
}
