//! Minimum-score selection over a scored population.
//!
//! Candidates are split into fixed groups of [`GROUP_SIZE`]. Inside a group,
//! lanes take turns offering their score to the group's [`GroupCells`]; the
//! turn order makes the winner independent of thread scheduling, with ties
//! going to the earlier lane. The population-wide best is found either by
//! running the same tournament over the group winners ([`reduce_two_stage`])
//! or by racing every candidate on one [`SharedBest`].

pub mod cells;
pub mod tournament;

pub use cells::{GroupCells, SharedBest};
pub use tournament::{GroupBest, reduce_group};

use crate::engine::config::Executor;

/// Number of lanes in a group.
pub const GROUP_SIZE: usize = 256;

/// Reduces `scores` level by level, `GROUP_SIZE` entries at a time, until one
/// winner remains. Returns `(index into scores, score)`, or `None` for no
/// scores.
pub fn reduce_two_stage(executor: Executor, scores: &[f64]) -> Option<(usize, f64)> {
    let mut level: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    while level.len() > 1 {
        level = level
            .chunks(GROUP_SIZE)
            .map(|chunk| {
                let chunk_scores: Vec<f64> = chunk.iter().map(|&(_, score)| score).collect();
                let best = reduce_group(executor, &chunk_scores);
                (chunk[best.lane].0, best.score)
            })
            .collect();
    }
    level.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_stage_finds_the_global_minimum_across_levels() {
        let mut scores: Vec<f64> = (0..GROUP_SIZE * GROUP_SIZE + 3)
            .map(|i| 10.0 + (i % 977) as f64)
            .collect();
        scores[40_000] = 1.0;
        assert_eq!(reduce_two_stage(Executor::Serial, &scores), Some((40_000, 1.0)));
    }

    #[test]
    fn two_stage_prefers_the_lowest_index_on_ties() {
        let mut scores = vec![5.0; 1000];
        scores[300] = 2.0;
        scores[700] = 2.0;
        assert_eq!(reduce_two_stage(Executor::Serial, &scores), Some((300, 2.0)));
    }

    #[test]
    fn two_stage_handles_single_and_empty_inputs() {
        assert_eq!(reduce_two_stage(Executor::Serial, &[]), None);
        assert_eq!(reduce_two_stage(Executor::Serial, &[3.5]), Some((0, 3.5)));
    }

    #[test]
    fn two_stage_agrees_across_executors() {
        let scores: Vec<f64> = (0..600).map(|i| ((i * 37) % 601) as f64).collect();
        assert_eq!(
            reduce_two_stage(Executor::Lockstep, &scores),
            reduce_two_stage(Executor::Serial, &scores)
        );
    }
}
