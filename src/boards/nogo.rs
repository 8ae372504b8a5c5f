use crate::board::{Board, Cell, Placement, Stone, BOARD_SIZE, CELL_COUNT};
use std::fmt;

/// An implementation of the `Board` trait for 9x9 NoGo.
///
/// Black moves first. A stone may be placed on an empty cell only if, afterwards, neither the
/// placed stone's group nor any neighbouring opponent group is left without a liberty: suicide
/// and capture are both forbidden. A player with no legal placement loses.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct NoGoBoard {
    field: [Option<Stone>; CELL_COUNT],
    mover: Stone,
}

impl NoGoBoard {
    /// Creates an empty board with black to move.
    pub fn new() -> Self {
        Self {
            field: [None; CELL_COUNT],
            mover: Stone::Black,
        }
    }

    /// Builds a position from nine rows of nine characters: `X` black, `O` white, `.` empty.
    ///
    /// The stones are set up directly, without checking that the position could arise in play.
    pub fn from_rows(rows: &[&str; BOARD_SIZE], mover: Stone) -> Result<Self, String> {
        let mut board = Self {
            field: [None; CELL_COUNT],
            mover,
        };
        for (row, text) in rows.iter().enumerate() {
            if text.chars().count() != BOARD_SIZE {
                return Err(format!("row {} must have {} cells: {:?}", row, BOARD_SIZE, text));
            }
            for (column, symbol) in text.chars().enumerate() {
                board.field[row * BOARD_SIZE + column] = match symbol {
                    'X' => Some(Stone::Black),
                    'O' => Some(Stone::White),
                    '.' => None,
                    other => return Err(format!("unknown cell symbol {:?}", other)),
                };
            }
        }
        Ok(board)
    }

    /// Returns the stone on `cell`, if any.
    pub fn stone_at(&self, cell: Cell) -> Option<Stone> {
        self.field.get(cell as usize).copied().flatten()
    }

    /// Returns the number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.field.iter().filter(|x| x.is_some()).count()
    }

    fn neighbours(cell: usize) -> impl Iterator<Item = usize> {
        let (row, column) = (cell / BOARD_SIZE, cell % BOARD_SIZE);
        let up = (row > 0).then(|| cell - BOARD_SIZE);
        let down = (row + 1 < BOARD_SIZE).then(|| cell + BOARD_SIZE);
        let left = (column > 0).then(|| cell - 1);
        let right = (column + 1 < BOARD_SIZE).then(|| cell + 1);
        [up, down, left, right].into_iter().flatten()
    }

    /// Flood-fills the group containing `cell` and reports whether it touches an empty cell.
    fn has_liberty(&self, cell: usize) -> bool {
        let Some(colour) = self.field[cell] else {
            return true;
        };
        let mut seen = [false; CELL_COUNT];
        let mut stack = Vec::with_capacity(CELL_COUNT);
        seen[cell] = true;
        stack.push(cell);
        while let Some(current) = stack.pop() {
            for next in Self::neighbours(current) {
                match self.field[next] {
                    None => return true,
                    Some(stone) if stone == colour && !seen[next] => {
                        seen[next] = true;
                        stack.push(next);
                    }
                    _ => {}
                }
            }
        }
        false
    }
}

impl Default for NoGoBoard {
    fn default() -> Self {
        NoGoBoard::new()
    }
}

impl Board for NoGoBoard {
    fn place(&mut self, cell: Cell) -> Placement {
        let index = cell as usize;
        if index >= CELL_COUNT || self.field[index].is_some() {
            return Placement::Illegal;
        }

        self.field[index] = Some(self.mover);
        let opponent = self.mover.opponent();
        let starves_opponent = Self::neighbours(index)
            .any(|next| self.field[next] == Some(opponent) && !self.has_liberty(next));
        if starves_opponent || !self.has_liberty(index) {
            self.field[index] = None;
            return Placement::Illegal;
        }

        self.mover = opponent;
        Placement::Legal
    }

    fn empty_cells(&self) -> Vec<Cell> {
        self.field
            .iter()
            .enumerate()
            .filter(|(_, x)| x.is_none())
            .map(|(i, _)| i as Cell)
            .collect()
    }

    fn mover(&self) -> Stone {
        self.mover
    }
}

impl fmt::Display for NoGoBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", row + 1)?;
            for column in 0..BOARD_SIZE {
                let symbol = match self.field[row * BOARD_SIZE + column] {
                    Some(Stone::Black) => 'X',
                    Some(Stone::White) => 'O',
                    None => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ABCDEFGHJ")
    }
}
