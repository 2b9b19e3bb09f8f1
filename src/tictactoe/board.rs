//! Board representation: cells, grids, moves and the mutable game board

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// A cell on the Tic-Tac-Toe board.
///
/// The derived ordering `Empty < O < X` is the order used to pick canonical
/// grids. It matches the byte order of `' '`, `'O'` and `'X'`, so genome files
/// written with that encoding canonicalize to the same keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Cell {
    #[default]
    Empty,
    O,
    X,
}

impl Cell {
    /// Character used when rendering a board for humans
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// Parse a cell from a board string; `.`, `_` and `-` all mean empty
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// Character used for this cell in genome files
    pub fn to_key_char(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// Strict inverse of [`Cell::to_key_char`]
    pub fn from_key_char(c: char) -> Option<Cell> {
        match c {
            '_' => Some(Cell::Empty),
            'X' => Some(Cell::X),
            'O' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// A 3x3 arrangement of cells stored row-major.
///
/// `Grid` is a plain value: copying it never aliases another board, and it
/// orders lexicographically over its nine cells, which makes it usable as a
/// genome key and as the comparison domain for canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Grid([Cell; 9]);

impl Grid {
    /// The all-empty grid
    pub fn empty() -> Self {
        Grid([Cell::Empty; 9])
    }

    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Grid(cells)
    }

    pub fn cells(&self) -> &[Cell; 9] {
        &self.0
    }

    /// Get cell at index (0-8)
    pub fn get(&self, index: usize) -> Cell {
        self.0[index]
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.0[index] = cell;
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.0[index] == Cell::Empty
    }

    /// Indices of all empty cells in ascending order
    pub fn empty_indices(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.is_empty_at(i)).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.0.iter().filter(|&&c| c == Cell::Empty).count()
    }

    pub fn occupied_count(&self) -> usize {
        9 - self.empty_count()
    }

    /// Parse a grid from 9 cell characters; whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if there are not exactly 9 non-whitespace characters
    /// or a character is not a valid cell.
    pub fn from_string(s: &str) -> crate::Result<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }
        Ok(Grid(cells))
    }

    /// Encode as the 9-character key used in genome files
    pub fn to_key(&self) -> String {
        self.0.iter().map(|c| c.to_key_char()).collect()
    }

    /// Decode a 9-character genome file key
    pub fn from_key(key: &str) -> Option<Self> {
        let chars: Vec<char> = key.chars().collect();
        if chars.len() != 9 {
            return None;
        }
        let mut cells = [Cell::Empty; 9];
        for (cell, c) in cells.iter_mut().zip(chars) {
            *cell = Cell::from_key_char(c)?;
        }
        Some(Grid(cells))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.0.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// A move expressed as zero-based (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        Move { row, col }
    }

    /// Build a move from a linear cell index (0-8)
    pub fn from_index(index: usize) -> Self {
        Move {
            row: index / 3,
            col: index % 3,
        }
    }

    /// Linear cell index, `row * 3 + col`
    pub fn index(&self) -> usize {
        self.row * 3 + self.col
    }

    pub fn in_bounds(&self) -> bool {
        self.row < 3 && self.col < 3
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

/// Mutable game board.
///
/// `used_cells` is tracked incrementally and always equals the number of
/// occupied cells in `grid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    used_cells: usize,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            grid: Grid::empty(),
            used_cells: 0,
        }
    }

    /// Create a board holding an existing grid
    pub fn from_grid(grid: Grid) -> Self {
        Board {
            used_cells: grid.occupied_count(),
            grid,
        }
    }

    /// Create a board from a string such as `"XO_.X...."`
    ///
    /// # Errors
    ///
    /// Returns error if the string does not describe exactly 9 valid cells.
    pub fn from_string(s: &str) -> crate::Result<Self> {
        Grid::from_string(s).map(Self::from_grid)
    }

    /// Clear every cell
    pub fn reset(&mut self) {
        self.grid = Grid::empty();
        self.used_cells = 0;
    }

    /// Read-only snapshot of the cells
    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn used_cells(&self) -> usize {
        self.used_cells
    }

    /// Cell at (row, col), or `None` when out of bounds
    pub fn get_cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row > 2 || col > 2 {
            return None;
        }
        Some(self.grid.get(row * 3 + col))
    }

    /// A move is valid when in bounds and the target cell is empty
    pub fn valid_move(&self, row: usize, col: usize) -> bool {
        self.get_cell(row, col) == Some(Cell::Empty)
    }

    /// Whether at least one empty cell remains
    pub fn is_move_left(&self) -> bool {
        self.grid.cells().contains(&Cell::Empty)
    }

    /// Whether all nine cells are used
    pub fn is_full(&self) -> bool {
        self.used_cells == 9
    }

    /// All valid moves in index order
    pub fn available_moves(&self) -> Vec<Move> {
        self.grid
            .empty_indices()
            .into_iter()
            .map(Move::from_index)
            .collect()
    }

    /// Place `player`'s mark at `mv`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMove`] if the move is out of bounds or the
    /// cell is occupied; the board is left unchanged.
    pub fn make_move(&mut self, player: Player, mv: Move) -> crate::Result<()> {
        if !self.valid_move(mv.row, mv.col) {
            return Err(crate::Error::InvalidMove {
                row: mv.row,
                col: mv.col,
            });
        }
        self.grid.set(mv.index(), player.to_cell());
        self.used_cells += 1;
        Ok(())
    }

    /// Whether the mark at `mv` completes a line
    pub fn check_win(&self, mv: Move) -> bool {
        match self.get_cell(mv.row, mv.col).and_then(Cell::to_player) {
            Some(player) => LineAnalyzer::line_through(self.grid.cells(), mv.index(), player),
            None => false,
        }
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(self.grid.cells(), player)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------")?;
        for row in 0..3 {
            write!(f, "|")?;
            for col in 0..3 {
                let c = match self.grid.get(row * 3 + col) {
                    Cell::Empty => ' ',
                    other => other.to_char(),
                };
                write!(f, " {c} |")?;
            }
            writeln!(f)?;
            writeln!(f, "-------------")?;
        }
        Ok(())
    }
}
