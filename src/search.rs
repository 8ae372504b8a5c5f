//! Search controller: runs MCTS cycles under a budget, on one tree or on several independent
//! trees in parallel, and turns the statistics into a single action.

use crate::board::{Action, Board, Cell, Move, Stone};
use crate::mcts::{DEFAULT_DECAY, DEFAULT_EXPLORATION, MonteCarloTreeSearch, MoveStats};
use crate::random::{DEFAULT_SEED, RandomGenerator, StandardRandomGenerator, derive_seed};
use log::{debug, trace};
use std::any::Any;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Iterations used when a budget of zero iterations is requested.
pub const DEFAULT_ITERATIONS: u32 = 1000;
/// Cycles run between two reads of the clock under a deadline budget.
pub const DEADLINE_BATCH: u32 = 10;
/// Time reserved at the end of a deadline budget for reading out the result.
pub const DEADLINE_MARGIN: Duration = Duration::from_millis(5);

/// How much work a search may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// A fixed number of cycles per tree. Zero means [`DEFAULT_ITERATIONS`].
    Iterations(u32),
    /// A wall-clock limit, checked every [`DEADLINE_BATCH`] cycles. At least one batch runs.
    Deadline(Duration),
}

impl Default for Budget {
    fn default() -> Self {
        Budget::Iterations(DEFAULT_ITERATIONS)
    }
}

/// Parameters of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Exploration constant `c` of the UCB formula.
    pub exploration: f64,
    /// Factor `psi` applied to the exploitation weight at every level of descent.
    pub decay: f64,
    pub budget: Budget,
    /// Number of independent trees searched in parallel. `0` and `1` both mean a single tree on
    /// the calling thread.
    pub threads: usize,
    /// Base seed; worker `i` uses `derive_seed(seed, i)`.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
            decay: DEFAULT_DECAY,
            budget: Budget::default(),
            threads: 1,
            seed: DEFAULT_SEED,
        }
    }
}

impl SearchConfig {
    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the per-depth decay of the exploitation term.
    pub fn with_decay(mut self, psi: f64) -> Self {
        self.decay = psi;
        self
    }

    /// Builder pattern: set the budget.
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Builder pattern: set the number of parallel trees.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Builder pattern: set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Errors that can occur while choosing a move.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("asked to move for {expected} but it is {actual}'s turn")]
    WrongTurn { expected: Stone, actual: Stone },
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The chosen action; [`Action::Pass`] when the position has no legal move.
    pub action: Action,
    /// Cycles performed, summed over all trees.
    pub cycles: u64,
    /// Statistics of the root moves, merged over all trees in parallel mode.
    pub root_stats: Vec<MoveStats>,
    pub elapsed: Duration,
}

/// When a tree stops searching.
#[derive(Debug, Clone, Copy)]
enum Stop {
    After(u32),
    At(Instant),
}

struct TreeReport {
    best: Option<Move>,
    root_stats: Vec<MoveStats>,
    cycles: u64,
}

/// Drives MCTS for one move decision at a time. No tree survives between calls.
pub struct Searcher<K: RandomGenerator = StandardRandomGenerator> {
    config: SearchConfig,
    _random: PhantomData<fn() -> K>,
}

impl<K: RandomGenerator> Searcher<K> {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            _random: PhantomData,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Chooses an action for the player to move in `board`.
    ///
    /// With more than one thread, every worker grows its own tree from its own seed and the
    /// root statistics are merged with [`merge_root_stats`] after all workers have joined. A
    /// panicking worker fails the whole search.
    pub fn search<T: Board + Send>(&self, board: &T) -> Result<SearchOutcome, SearchError> {
        let started = Instant::now();
        let stop = match self.config.budget {
            Budget::Iterations(0) => Stop::After(DEFAULT_ITERATIONS),
            Budget::Iterations(n) => Stop::After(n),
            Budget::Deadline(limit) => Stop::At(started + limit.saturating_sub(DEADLINE_MARGIN)),
        };

        let (action, root_stats, cycles) = if self.config.threads <= 1 {
            let report = self.run_tree(board.clone(), stop, derive_seed(self.config.seed, 0));
            (Action::from(report.best), report.root_stats, report.cycles)
        } else {
            let reports = self.run_parallel(board, stop)?;
            let cycles = reports.iter().map(|r| r.cycles).sum();
            let merged = merge_root_stats(reports.iter().map(|r| r.root_stats.as_slice()));
            (Action::from(best_merged_move(&merged)), merged, cycles)
        };

        let elapsed = started.elapsed();
        debug!(
            "{} searched {} cycles on {} tree(s) in {:?}, chose {}",
            board.mover(),
            cycles,
            self.config.threads.max(1),
            elapsed,
            action
        );

        Ok(SearchOutcome {
            action,
            cycles,
            root_stats,
            elapsed,
        })
    }

    fn run_parallel<T: Board + Send>(
        &self,
        board: &T,
        stop: Stop,
    ) -> Result<Vec<TreeReport>, SearchError> {
        let joined: Vec<thread::Result<TreeReport>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.config.threads)
                .map(|worker| {
                    let board = board.clone();
                    let seed = derive_seed(self.config.seed, worker);
                    scope.spawn(move || {
                        let report = self.run_tree(board, stop, seed);
                        trace!("worker {} finished {} cycles", worker, report.cycles);
                        report
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join()).collect()
        });

        joined
            .into_iter()
            .enumerate()
            .map(|(worker, result)| {
                result.map_err(|payload| SearchError::WorkerPanicked {
                    worker,
                    message: panic_message(payload.as_ref()),
                })
            })
            .collect()
    }

    fn run_tree<T: Board>(&self, board: T, stop: Stop, seed: u64) -> TreeReport {
        let mut mcts = MonteCarloTreeSearch::builder(board)
            .with_random_generator(K::from_seed(seed))
            .with_exploration(self.config.exploration)
            .with_decay(self.config.decay)
            .build();

        let cycles = match stop {
            Stop::After(n) => {
                mcts.iterate_n_times(n);
                u64::from(n)
            }
            Stop::At(deadline) => mcts.iterate_until(deadline, DEADLINE_BATCH),
        };

        TreeReport {
            best: mcts.best_child_by_visits(),
            root_stats: mcts.root_stats(),
            cycles,
        }
    }
}

impl<K: RandomGenerator> Default for Searcher<K> {
    fn default() -> Self {
        Searcher::new(SearchConfig::default())
    }
}

/// Sums `(wins, visits)` of the root moves of several trees, keyed by target cell.
///
/// The result is ordered by cell, so it does not depend on the order of the trees.
pub fn merge_root_stats<'a>(trees: impl IntoIterator<Item = &'a [MoveStats]>) -> Vec<MoveStats> {
    let mut merged: BTreeMap<Cell, MoveStats> = BTreeMap::new();
    for stats in trees {
        for s in stats {
            merged
                .entry(s.mv.cell)
                .and_modify(|m| {
                    m.wins += s.wins;
                    m.visits += s.visits;
                })
                .or_insert(*s);
        }
    }
    merged.into_values().collect()
}

/// Picks the move with the most visits, then the most wins, then the lowest cell.
pub fn best_merged_move(stats: &[MoveStats]) -> Option<Move> {
    stats
        .iter()
        .max_by_key(|s| (s.visits, s.wins, Reverse(s.mv.cell)))
        .map(|s| s.mv)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
