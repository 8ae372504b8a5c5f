use crate::board::{Board, Cell, Move, Stone};
use crate::random::RandomGenerator;

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node owns a snapshot of the game state, the legal moves that have not been expanded yet
/// and the statistics gathered by the simulations that passed through it. Parent and child links
/// are kept by the tree arena.
#[derive(Debug, Clone)]
pub struct MctsNode<T: Board> {
    /// The depth of the node in the tree.
    pub height: u32,
    /// The game state after `prev_move` was played.
    pub board: T,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<Move>,
    /// The number of simulations that passed through this node.
    pub visits: u32,
    /// The number of those simulations won by the player to move in `board`.
    pub wins: u32,
    /// Legal moves not yet expanded into children, consumed from the back.
    frontier: Vec<Cell>,
    /// Cells still empty in `board`.
    empty_cells: Vec<Cell>,
    /// Fixed outcome of a terminal node: the player who wins because the mover cannot play.
    winner: Option<Stone>,
}

impl<T: Board> MctsNode<T> {
    /// Creates a root node, scanning the whole board for empty cells.
    pub fn new_root<K: RandomGenerator>(board: T, random: &mut K) -> Self {
        let empty_cells = board.empty_cells();
        MctsNode::with_cells(board, empty_cells, None, 0, random)
    }

    /// Creates the child reached by `prev_move`, reusing the parent's cached empty cells.
    pub fn new_child<K: RandomGenerator>(
        board: T,
        parent_empty_cells: &[Cell],
        prev_move: Move,
        height: u32,
        random: &mut K,
    ) -> Self {
        let empty_cells = parent_empty_cells
            .iter()
            .copied()
            .filter(|&cell| cell != prev_move.cell)
            .collect();
        MctsNode::with_cells(board, empty_cells, Some(prev_move), height, random)
    }

    fn with_cells<K: RandomGenerator>(
        board: T,
        empty_cells: Vec<Cell>,
        prev_move: Option<Move>,
        height: u32,
        random: &mut K,
    ) -> Self {
        let mut frontier: Vec<Cell> = empty_cells
            .iter()
            .copied()
            .filter(|&cell| board.is_legal(cell))
            .collect();
        random.shuffle(&mut frontier);
        let winner = frontier.is_empty().then(|| board.mover().opponent());

        MctsNode {
            height,
            board,
            prev_move,
            visits: 0,
            wins: 0,
            frontier,
            empty_cells,
            winner,
        }
    }

    /// The player to move in this node's state.
    pub fn mover(&self) -> Stone {
        self.board.mover()
    }

    /// True if the mover has no legal placement.
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// The fixed winner of a terminal node.
    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    /// Moves that have not been expanded yet, in the order they will be taken (last first).
    pub fn frontier(&self) -> &[Cell] {
        &self.frontier
    }

    pub fn empty_cells(&self) -> &[Cell] {
        &self.empty_cells
    }

    pub(crate) fn empty_cells_mut(&mut self) -> &mut [Cell] {
        &mut self.empty_cells
    }

    /// Removes the next move to expand.
    pub(crate) fn pop_frontier(&mut self) -> Option<Cell> {
        self.frontier.pop()
    }

    /// Counts one finished simulation.
    pub fn update(&mut self, won: bool) {
        self.visits += 1;
        if won {
            self.wins += 1;
        }
    }
}
