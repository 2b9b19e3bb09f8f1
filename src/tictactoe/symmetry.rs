//! D4 symmetry operations for board canonicalization
//!
//! The eight symmetries of the square are enumerated as `rotate^r(flip^f(x))`
//! with `f` in `{false, true}` as the outer loop and `r` in `0..4` as the inner
//! loop. The inverse of `(r, f)` rotates `(4 - r) % 4` more times and then
//! flips if `f` is set.

use serde::{Deserialize, Serialize};

use super::board::{Cell, Grid, Move};

/// Rotate a grid 90° clockwise: `new[i][j] = old[2 - j][i]`
pub fn rotate(grid: &Grid) -> Grid {
    let mut cells = [Cell::Empty; 9];
    for i in 0..3 {
        for j in 0..3 {
            cells[i * 3 + j] = grid.get((2 - j) * 3 + i);
        }
    }
    Grid::from_cells(cells)
}

/// Mirror a grid across the vertical axis
pub fn flip(grid: &Grid) -> Grid {
    let mut cells = *grid.cells();
    for row in 0..3 {
        cells.swap(row * 3, row * 3 + 2);
    }
    Grid::from_cells(cells)
}

/// Follow a cell through [`rotate`]
pub fn rotate_move(mv: Move) -> Move {
    Move::new(mv.col, 2 - mv.row)
}

/// Follow a cell through [`flip`]
pub fn flip_move(mv: Move) -> Move {
    Move::new(mv.row, 2 - mv.col)
}

/// One element of the board's symmetry group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symmetry {
    /// Number of clockwise quarter turns (0-3)
    pub rotation: u8,
    /// Whether the board is mirrored before rotating
    pub flip: bool,
}

impl Symmetry {
    /// Create identity transform
    pub fn identity() -> Self {
        Symmetry {
            rotation: 0,
            flip: false,
        }
    }

    /// All 8 symmetries in enumeration order
    pub fn all() -> [Symmetry; 8] {
        let mut all = [Symmetry::identity(); 8];
        for (i, slot) in all.iter_mut().enumerate() {
            *slot = Symmetry {
                rotation: (i % 4) as u8,
                flip: i >= 4,
            };
        }
        all
    }

    fn inverse_rotations(&self) -> u8 {
        (4 - self.rotation % 4) % 4
    }

    /// Map a raw grid into this symmetry's orientation
    pub fn apply_grid(&self, grid: &Grid) -> Grid {
        let mut out = if self.flip { flip(grid) } else { *grid };
        for _ in 0..self.rotation % 4 {
            out = rotate(&out);
        }
        out
    }

    /// Map a raw move into this symmetry's orientation
    pub fn apply_move(&self, mv: Move) -> Move {
        let mut out = if self.flip { flip_move(mv) } else { mv };
        for _ in 0..self.rotation % 4 {
            out = rotate_move(out);
        }
        out
    }

    /// Map a raw cell index into this symmetry's orientation
    pub fn apply_index(&self, index: usize) -> usize {
        self.apply_move(Move::from_index(index)).index()
    }

    /// Undo [`Symmetry::apply_grid`]
    pub fn invert_grid(&self, grid: &Grid) -> Grid {
        let mut out = *grid;
        for _ in 0..self.inverse_rotations() {
            out = rotate(&out);
        }
        if self.flip { flip(&out) } else { out }
    }

    /// Undo [`Symmetry::apply_move`]
    pub fn invert_move(&self, mv: Move) -> Move {
        let mut out = mv;
        for _ in 0..self.inverse_rotations() {
            out = rotate_move(out);
        }
        if self.flip { flip_move(out) } else { out }
    }

    /// Undo [`Symmetry::apply_index`]
    pub fn invert_index(&self, index: usize) -> usize {
        self.invert_move(Move::from_index(index)).index()
    }
}

impl Default for Symmetry {
    fn default() -> Self {
        Self::identity()
    }
}

/// Result of canonicalizing a grid and a reference move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonical {
    /// Lexicographically smallest member of the grid's orbit
    pub grid: Grid,
    /// The reference move in canonical coordinates
    pub mv: Move,
    /// The symmetry that maps the raw grid onto `grid`
    pub symmetry: Symmetry,
}

impl Canonical {
    /// Map a canonical move back to raw coordinates
    pub fn to_raw_move(&self, canonical_move: Move) -> Move {
        self.symmetry.invert_move(canonical_move)
    }
}

/// Find the canonical representative of `grid` and carry `mv` along.
///
/// A candidate only replaces the running best when it is strictly smaller, so
/// for grids with internal symmetry the earliest transform in enumeration
/// order wins and an already-canonical grid always comes back with the
/// identity.
pub fn canonicalize(grid: &Grid, mv: Move) -> Canonical {
    let mut best = Canonical {
        grid: *grid,
        mv,
        symmetry: Symmetry::identity(),
    };

    for symmetry in Symmetry::all() {
        let candidate = symmetry.apply_grid(grid);
        if candidate < best.grid {
            best = Canonical {
                grid: candidate,
                mv: symmetry.apply_move(mv),
                symmetry,
            };
        }
    }

    best
}

/// Map a canonical grid and move back to the raw orientation
pub fn uncanonicalize(grid: &Grid, mv: Move, symmetry: Symmetry) -> (Grid, Move) {
    (symmetry.invert_grid(grid), symmetry.invert_move(mv))
}

impl Grid {
    /// Get the canonical (lexicographically minimal) form under D4 symmetry
    pub fn canonical(&self) -> Grid {
        canonicalize(self, Move::new(0, 0)).grid
    }
}
