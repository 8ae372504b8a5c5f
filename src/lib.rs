//! Monte Carlo tree search engine for 9x9 NoGo.
//!
//! NoGo is played like Go on a 9x9 grid, except that capturing is forbidden as well as suicide:
//! a stone may only be placed if every group on the board keeps at least one liberty. The player
//! who cannot place a stone loses.
//!
//! The engine grows one child per iteration, scores children with a UCB formula whose
//! exploitation term is scaled by a per-depth factor `psi`, estimates positions with uniformly
//! random playouts and can search several independent trees in parallel (root parallelization),
//! merging their root statistics at the end.
//!
//! # Example
//!
//! ```rust
//! use nogo_mcts::board::Action;
//! use nogo_mcts::boards::nogo::NoGoBoard;
//! use nogo_mcts::search::{Budget, SearchConfig, Searcher};
//!
//! // Search the empty board with four trees of 500 iterations each
//! let config = SearchConfig::default()
//!     .with_budget(Budget::Iterations(500))
//!     .with_threads(4)
//!     .with_seed(42);
//! let searcher: Searcher = Searcher::new(config);
//! let outcome = searcher.search(&NoGoBoard::default()).unwrap();
//!
//! match outcome.action {
//!     Action::Place(mv) => println!("The best move is: {}", mv),
//!     Action::Pass => println!("No legal move left"),
//! }
//! ```

/// Contains the `Player` agent that turns a configuration into moves.
pub mod agent;
/// Contains the `Board` trait and the move types exchanged with the engine.
pub mod board;
/// Contains implementations of the `Board` trait.
pub mod boards;
/// Parsing of `key=value` agent arguments.
pub mod config;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains traits and implementations for random number generation.
pub mod random;
/// The search controller: budgets, root parallelization and result aggregation.
pub mod search;
