use crate::board::{Action, Board, Cell, Move, Stone};
use crate::config::{AgentConfig, ConfigError};
use crate::random::{DEFAULT_SEED, RandomGenerator, StandardRandomGenerator};
use crate::search::{SearchError, Searcher};
use log::info;

/// A player for either colour: MCTS when the configuration enables search, uniformly random
/// legal moves otherwise.
///
/// The player owns one random stream. Each decision draws a fresh base seed from it, so a whole
/// game is reproducible from the configured seed while consecutive searches differ.
pub struct Player<K: RandomGenerator = StandardRandomGenerator> {
    config: AgentConfig,
    random: K,
}

impl<K: RandomGenerator> Player<K> {
    /// Creates a player from `key=value` arguments, e.g. `"name=mcts role=black T=1000 threads=4"`.
    pub fn new(args: &str) -> Result<Self, ConfigError> {
        let config = AgentConfig::parse(args)?;
        let random = K::from_seed(config.seed().unwrap_or(DEFAULT_SEED));
        info!(
            "{} plays {} using {}",
            config.name,
            config.role,
            if config.search.is_some() { "mcts" } else { "random moves" }
        );
        Ok(Self { config, random })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn role(&self) -> Stone {
        self.config.role
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Chooses the next action on `board`, which must have this player to move.
    ///
    /// Returns [`Action::Pass`] when no legal placement exists.
    pub fn take_action<T: Board + Send>(&mut self, board: &T) -> Result<Action, SearchError> {
        if board.mover() != self.config.role {
            return Err(SearchError::WrongTurn {
                expected: self.config.role,
                actual: board.mover(),
            });
        }

        let Some(search) = self.config.search.clone() else {
            return Ok(self.random_action(board));
        };
        let config = search.with_seed(self.random.next());
        let outcome = Searcher::<K>::new(config).search(board)?;
        Ok(outcome.action)
    }

    fn random_action<T: Board>(&mut self, board: &T) -> Action {
        let legal: Vec<Cell> = board
            .empty_cells()
            .into_iter()
            .filter(|&cell| board.is_legal(cell))
            .collect();
        let role = self.config.role;
        self.random
            .get_random_from_vec(&legal)
            .map(|&cell| Move::new(cell, role))
            .into()
    }
}
