use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// The two cells a group's lanes compete on, `best_index` and `best_score`.
///
/// Mutation happens only inside a lane's turn, and turns are separated by a
/// barrier (or run on one thread), so the cells never see two writers at
/// once and relaxed orderings suffice; the barrier provides the
/// happens-before edge between turns.
#[derive(Debug)]
pub struct GroupCells {
    best_index: AtomicUsize,
    best_score: AtomicU64,
}

impl Default for GroupCells {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupCells {
    pub fn new() -> Self {
        Self {
            best_index: AtomicUsize::new(0),
            best_score: AtomicU64::new(f64::INFINITY.to_bits()),
        }
    }

    pub fn load(&self) -> (usize, f64) {
        (
            self.best_index.load(Ordering::Relaxed),
            f64::from_bits(self.best_score.load(Ordering::Relaxed)),
        )
    }

    /// Replaces the best with `(index, score)` if `score` is strictly lower.
    /// Ties keep the incumbent; NaN never compares lower.
    pub fn offer(&self, index: usize, score: f64) -> bool {
        let (_, best) = self.load();
        if score < best {
            self.best_score.store(score.to_bits(), Ordering::Relaxed);
            self.best_index.store(index, Ordering::Relaxed);
            true
        } else {
            false
        }
    }
}

/// A single best cell shared by every candidate with no turn discipline.
///
/// Concurrent offers race: the check and the two stores are not one atomic
/// step, so a lower score can be overwritten and the index/score pair can be
/// torn. Memory-safe, but only approximate.
#[derive(Debug)]
pub struct SharedBest {
    cells: GroupCells,
}

impl Default for SharedBest {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedBest {
    pub fn new() -> Self {
        Self {
            cells: GroupCells::new(),
        }
    }

    pub fn offer(&self, index: usize, score: f64) {
        self.cells.offer(index, score);
    }

    pub fn load(&self) -> (usize, f64) {
        self.cells.load()
    }
}
