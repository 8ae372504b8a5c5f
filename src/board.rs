use std::fmt;
use std::str::FromStr;

/// Width and height of the playing grid.
pub const BOARD_SIZE: usize = 9;
/// Number of cells on the playing grid.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Index of a cell, row-major, in `0..CELL_COUNT`.
pub type Cell = u8;

/// The central trait of the library, defining the interface for a game state.
///
/// The MCTS engine only talks to the game through this trait. Every search node owns its own
/// copy of the state, so implementations should be cheap to clone.
pub trait Board: Default + Clone {
    /// Attempts to place a stone for the current mover on `cell`.
    ///
    /// The state is mutated (and the turn passes to the opponent) only when the placement is
    /// legal; an illegal attempt leaves the state untouched.
    fn place(&mut self, cell: Cell) -> Placement;

    /// Returns every cell that is currently unoccupied, in ascending order.
    fn empty_cells(&self) -> Vec<Cell>;

    /// Returns the player whose turn it is to place a stone.
    fn mover(&self) -> Stone;

    /// Checks whether the current mover may place a stone on `cell`, without changing the state.
    fn is_legal(&self, cell: Cell) -> bool {
        self.clone().place(cell) == Placement::Legal
    }
}

/// Result of a placement attempt.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Placement {
    /// The stone was placed and the turn has passed to the opponent.
    Legal,
    /// The placement breaks the rules; the board was not modified.
    Illegal,
}

/// A stone colour, which doubles as the player identity.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// Returns the other player.
    pub const fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => f.write_str("black"),
            Stone::White => f.write_str("white"),
        }
    }
}

impl FromStr for Stone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => Ok(Stone::Black),
            "white" => Ok(Stone::White),
            other => Err(other.to_string()),
        }
    }
}

/// A placement of a stone of the given colour on a cell.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Move {
    pub cell: Cell,
    pub stone: Stone,
}

impl Move {
    pub const fn new(cell: Cell, stone: Stone) -> Self {
        Self { cell, stone }
    }

    /// Returns the `(row, column)` coordinates of the target cell.
    pub const fn coordinates(&self) -> (usize, usize) {
        let cell = self.cell as usize;
        (cell / BOARD_SIZE, cell % BOARD_SIZE)
    }
}

impl fmt::Display for Move {
    /// Formats as `B A1` / `W J9` using Go-style column letters (no `I`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const COLUMNS: &[u8; BOARD_SIZE] = b"ABCDEFGHJ";
        let (row, column) = self.coordinates();
        let colour = match self.stone {
            Stone::Black => 'B',
            Stone::White => 'W',
        };
        write!(f, "{} {}{}", colour, COLUMNS[column] as char, row + 1)
    }
}

/// The decision returned to the caller of the engine.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Action {
    /// Place a stone.
    Place(Move),
    /// No legal placement exists; the player has lost the game.
    Pass,
}

impl Action {
    /// Returns the placement, or `None` for [`Action::Pass`].
    pub fn placement(&self) -> Option<Move> {
        match self {
            Action::Place(mv) => Some(*mv),
            Action::Pass => None,
        }
    }
}

impl From<Option<Move>> for Action {
    fn from(mv: Option<Move>) -> Self {
        mv.map_or(Action::Pass, Action::Place)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(mv) => write!(f, "{mv}"),
            Action::Pass => f.write_str("pass"),
        }
    }
}
