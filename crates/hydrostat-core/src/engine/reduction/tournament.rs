use super::cells::GroupCells;
use crate::engine::config::Executor;
use std::sync::Barrier;
use std::thread;

/// Separates the turns of a tournament.
pub trait TurnBarrier: Sync {
    fn wait(&self);
}

impl TurnBarrier for Barrier {
    fn wait(&self) {
        Barrier::wait(self);
    }
}

/// Turn separator for a tournament run on one thread, where program order
/// already separates the turns.
pub struct SingleThread;

impl TurnBarrier for SingleThread {
    fn wait(&self) {}
}

/// Body of a lane's own turn.
#[inline]
fn take_turn(lane: usize, score: f64, cells: &GroupCells) {
    cells.offer(lane, score);
}

/// The program one lane runs: on its own turn it offers its score, and on
/// every turn it waits at the barrier.
pub fn run_lane<B: TurnBarrier + ?Sized>(
    lane: usize,
    group_len: usize,
    score: f64,
    cells: &GroupCells,
    barrier: &B,
) {
    for turn in 0..group_len {
        if turn == lane {
            take_turn(lane, score, cells);
        }
        barrier.wait();
    }
}

/// Winner of one group, as a lane index within the group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupBest {
    pub lane: usize,
    pub score: f64,
}

impl From<(usize, f64)> for GroupBest {
    fn from((lane, score): (usize, f64)) -> Self {
        Self { lane, score }
    }
}

/// Runs every lane's turn in lane order on the calling thread.
pub fn reduce_serial(scores: &[f64]) -> GroupBest {
    let cells = GroupCells::new();
    for (lane, &score) in scores.iter().enumerate() {
        take_turn(lane, score, &cells);
    }
    cells.load().into()
}

/// Runs one scoped thread per lane, with a barrier after every turn.
pub fn reduce_lockstep(scores: &[f64]) -> GroupBest {
    let cells = GroupCells::new();
    let barrier = Barrier::new(scores.len());
    thread::scope(|scope| {
        for (lane, &score) in scores.iter().enumerate() {
            let (cells, barrier) = (&cells, &barrier);
            scope.spawn(move || run_lane(lane, scores.len(), score, cells, barrier));
        }
    });
    cells.load().into()
}

/// Reduces one group of at most [`super::GROUP_SIZE`] scores.
pub fn reduce_group(executor: Executor, scores: &[f64]) -> GroupBest {
    match executor {
        Executor::Serial => reduce_serial(scores),
        Executor::Lockstep => reduce_lockstep(scores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand::seq::SliceRandom;
    use rand_pcg::Pcg32;

    fn distinct_scores(n: usize) -> Vec<f64> {
        (0..n).map(|i| 1.0 + (i as f64) * 0.5).collect()
    }

    #[test]
    fn run_lane_on_one_thread_matches_serial_reduction() {
        let scores = [4.0, 2.0, 9.0, 2.0];
        let cells = GroupCells::new();
        for (lane, &score) in scores.iter().enumerate() {
            run_lane(lane, scores.len(), score, &cells, &SingleThread);
        }
        assert_eq!(GroupBest::from(cells.load()), reduce_serial(&scores));
    }

    #[test]
    fn serial_picks_the_minimum_and_first_tie() {
        let best = reduce_serial(&[4.0, 2.0, 9.0, 2.0]);
        assert_eq!(best, GroupBest { lane: 1, score: 2.0 });
    }

    #[test]
    fn empty_group_reports_the_initial_cells() {
        assert_eq!(reduce_serial(&[]), GroupBest { lane: 0, score: f64::INFINITY });
        assert_eq!(reduce_lockstep(&[]), GroupBest { lane: 0, score: f64::INFINITY });
    }

    #[test]
    fn all_nan_group_keeps_lane_zero() {
        let best = reduce_serial(&[f64::NAN, f64::NAN]);
        assert_eq!(best.lane, 0);
        assert!(best.score.is_infinite());
    }

    #[test]
    fn winner_is_invariant_under_permutation_of_a_full_group() {
        let mut scores = distinct_scores(256);
        let mut rng = Pcg32::seed_from_u64(17);
        for _ in 0..16 {
            scores.shuffle(&mut rng);
            let best = reduce_serial(&scores);
            assert_eq!(best.score, 1.0);
            assert_eq!(scores[best.lane], 1.0);
        }
    }

    #[test]
    fn winner_is_invariant_under_every_permutation_of_a_small_group() {
        let scores = [0.3, 0.1, 0.7, 0.2, 0.9];
        for permutation in scores.iter().copied().permutations(scores.len()) {
            let best = reduce_serial(&permutation);
            assert_eq!(best.score, 0.1);
            assert_eq!(permutation[best.lane], 0.1);
        }
    }

    #[test]
    fn lockstep_agrees_with_serial() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scores = distinct_scores(256);
        scores[17] = 0.5;
        scores[200] = 0.5;
        scores.shuffle(&mut rng);
        assert_eq!(reduce_lockstep(&scores), reduce_serial(&scores));
        assert_eq!(
            reduce_group(Executor::Lockstep, &scores[..37]),
            reduce_group(Executor::Serial, &scores[..37])
        );
    }
}
