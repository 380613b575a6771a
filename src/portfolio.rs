//! Weighted heuristic portfolio with per-heuristic timing.
//!
//! Each entry owns its counters. `evaluate` is the timing decorator around
//! the scoring function; it is safe to call from any number of rayon workers
//! at once. Counters sit behind one lock so a read-and-reset always sees a
//! consistent (time, count) pair and never drops a concurrent update.

use log::info;
use parking_lot::Mutex;
use std::fmt;
use std::time::Instant;

use crate::snapshot::GameSnapshot;

/// Scoring function over a hypothetical future state; higher is better
pub type HeuristicFn = Box<dyn Fn(&GameSnapshot) -> f64 + Send + Sync>;

/// Accumulated timing for one heuristic since the last reset
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicStats {
    pub micros: u64,
    pub evaluations: u64,
}

impl HeuristicStats {
    pub fn avg_micros(&self) -> f64 {
        if self.evaluations > 0 {
            self.micros as f64 / self.evaluations as f64
        } else {
            0.0
        }
    }

    pub fn total_millis(&self) -> f64 {
        self.micros as f64 / 1000.0
    }
}

pub struct WeightedHeuristic {
    name: String,
    weight: f64,
    f: HeuristicFn,
    stats: Mutex<HeuristicStats>,
}

impl WeightedHeuristic {
    pub fn new<F>(weight: f64, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&GameSnapshot) -> f64 + Send + Sync + 'static,
    {
        WeightedHeuristic {
            name: name.into(),
            weight,
            f: Box::new(f),
            stats: Mutex::new(HeuristicStats::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn name_and_weight(&self) -> String {
        format!("{}, w={:.2}", self.name, self.weight)
    }

    /// Scores `snapshot`, recording elapsed time and one evaluation.
    /// The raw score is returned unchanged.
    pub fn evaluate(&self, snapshot: &GameSnapshot) -> f64 {
        let start = Instant::now();
        let score = (self.f)(snapshot);
        self.record(start.elapsed().as_micros() as u64);
        score
    }

    fn record(&self, micros: u64) {
        let mut stats = self.stats.lock();
        stats.micros += micros;
        stats.evaluations += 1;
    }

    /// Returns the counters accumulated so far and zeroes them
    pub fn get_and_reset_stats(&self) -> HeuristicStats {
        std::mem::take(&mut *self.stats.lock())
    }
}

impl fmt::Debug for WeightedHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedHeuristic")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of heuristics. Order only affects reporting.
#[derive(Debug, Default)]
pub struct Portfolio {
    heuristics: Vec<WeightedHeuristic>,
}

impl Portfolio {
    pub fn new(heuristics: Vec<WeightedHeuristic>) -> Self {
        Portfolio { heuristics }
    }

    pub fn heuristics(&self) -> &[WeightedHeuristic] {
        &self.heuristics
    }

    pub fn len(&self) -> usize {
        self.heuristics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heuristics.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.heuristics.iter().map(|h| h.weight()).sum()
    }

    /// Drains every heuristic's counters and logs those that ran
    pub fn log_performance_stats(&self) {
        info!("### Performance Stats:");
        for h in &self.heuristics {
            let stats = h.get_and_reset_stats();
            if stats.evaluations > 0 {
                info!(
                    "###   {:>25}: {:6} evals, {:8.2} µs/eval, {:8.2} ms total",
                    h.name(),
                    stats.evaluations,
                    stats.avg_micros(),
                    stats.total_millis()
                );
            }
        }
    }
}
