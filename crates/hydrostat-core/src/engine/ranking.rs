use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
pub struct RankedCandidate {
    pub index: usize,
    pub score: f64,
}

impl PartialEq for RankedCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for RankedCandidate {}

impl PartialOrd for RankedCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Worse candidates order greater, so the heap top is the one to evict.
impl Ord for RankedCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.index.cmp(&other.index))
    }
}

/// The `k` lowest finite scores in ascending order, earlier index first on
/// ties.
pub fn top_k(scores: &[f64], k: usize) -> Vec<RankedCandidate> {
    if k == 0 {
        return Vec::new();
    }
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (index, &score) in scores.iter().enumerate() {
        if !score.is_finite() {
            continue;
        }
        heap.push(RankedCandidate { index, score });
        if heap.len() > k {
            heap.pop();
        }
    }
    heap.into_sorted_vec()
}
