//! Best score tracking
//!
//! A single persisted integer: the highest finalized score across runs.
//! Written at most once per crash, and only when beaten.

use crate::consts::BEST_SCORE_KEY;
use crate::persistence::PersistentStore;

/// Result of finalizing a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    /// Truncated run score, as displayed
    pub score: u64,
    /// Best score after this run
    pub best: u64,
    /// Whether this run set a new best
    pub new_best: bool,
}

/// Finalizes run scores against the persisted best
#[derive(Debug, Clone)]
pub struct ScoreKeeper<S: PersistentStore> {
    store: S,
}

impl<S: PersistentStore> ScoreKeeper<S> {
    pub fn new(store: S) -> Self {
        let keeper = Self { store };
        log::info!("Best score: {}", keeper.best());
        keeper
    }

    /// Persisted best, 0 if never set
    pub fn best(&self) -> u64 {
        self.store.get(BEST_SCORE_KEY)
    }

    /// Truncate the run score and keep the maximum
    pub fn on_crash(&mut self, score: f64) -> FinalScore {
        let score = if score.is_finite() && score > 0.0 {
            score as u64
        } else {
            0
        };
        let previous = self.best();
        let new_best = score > previous;
        if new_best {
            self.store.set(BEST_SCORE_KEY, score);
            log::info!("New best score: {} (was {})", score, previous);
        }
        FinalScore {
            score,
            best: previous.max(score),
            new_best,
        }
    }
}
