use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ranker::TieBreak;

pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;
pub const DEFAULT_DEADLINE_MS: u64 = 5_000;

/// Execution knobs for a ranking call. None of them change scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub worker_threads: usize,
    pub parallel_threshold: usize,
    pub deadline_ms: u64,
    pub tie_break: TieBreak,
}

impl RankingConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Single-threaded scoring, used by the CLI and tests.
    pub fn sequential() -> Self {
        Self {
            worker_threads: 1,
            ..Self::default()
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            deadline_ms: DEFAULT_DEADLINE_MS,
            tie_break: TieBreak::default(),
        }
    }
}

pub fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|threads| threads.get())
        .unwrap_or(1)
}
