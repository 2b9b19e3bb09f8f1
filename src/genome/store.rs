//! Genome storage keyed by canonical grid

use std::{collections::BTreeMap, fmt};

use crate::tictactoe::{Grid, Symmetry};

/// Default score given to every playable cell of a newly seen grid
pub const DEFAULT_INITIAL_SCORE: i64 = 100;

/// Largest score a single cell may hold, so nine of them still sum in `i64`
pub const MAX_SCORE: i64 = i64::MAX / 9;

/// Nine per-cell scores for one canonical grid, in canonical orientation.
///
/// Occupied cells score 0 from creation and are never selected; playable
/// cells start at the store's initial score and are kept at 1 or more by the
/// reward rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Genome([i64; 9]);

impl Genome {
    /// Fresh genome for `grid`: `initial_score` on empty cells, 0 elsewhere
    pub fn for_grid(grid: &Grid, initial_score: i64) -> Self {
        let mut scores = [0; 9];
        for index in grid.empty_indices() {
            scores[index] = initial_score;
        }
        Genome(scores)
    }

    pub fn from_scores(scores: [i64; 9]) -> Self {
        Genome(scores)
    }

    pub fn scores(&self) -> &[i64; 9] {
        &self.0
    }

    pub fn score(&self, index: usize) -> i64 {
        self.0[index]
    }

    pub fn set_score(&mut self, index: usize, score: i64) {
        self.0[index] = score;
    }

    /// Sum of all nine scores, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.0.iter().fold(0i64, |sum, &score| sum.saturating_add(score))
    }

    /// Re-express the scores in the raw orientation that `symmetry` was
    /// applied to: `raw[p] = canonical[symmetry(p)]`
    pub fn to_raw(&self, symmetry: Symmetry) -> Genome {
        let mut raw = [0; 9];
        for (index, slot) in raw.iter_mut().enumerate() {
            *slot = self.0[symmetry.apply_index(index)];
        }
        Genome(raw)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, score) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{score}")?;
        }
        Ok(())
    }
}

/// Map from canonical grid to genome.
///
/// Entries are only ever added or overwritten, never removed, except by an
/// explicit [`GenomeStore::clear`] before a reload. Iteration is ordered by
/// grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeStore {
    entries: BTreeMap<Grid, Genome>,
    initial_score: i64,
}

impl GenomeStore {
    pub fn new() -> Self {
        Self::with_initial_score(DEFAULT_INITIAL_SCORE)
    }

    pub fn with_initial_score(initial_score: i64) -> Self {
        Self {
            entries: BTreeMap::new(),
            initial_score,
        }
    }

    pub fn initial_score(&self) -> i64 {
        self.initial_score
    }

    pub fn contains(&self, grid: &Grid) -> bool {
        self.entries.contains_key(grid)
    }

    pub fn get(&self, grid: &Grid) -> Option<&Genome> {
        self.entries.get(grid)
    }

    /// Return the genome for `grid`, creating it first if it is new
    pub fn get_or_create(&mut self, grid: &Grid) -> &Genome {
        let initial_score = self.initial_score;
        self.entries
            .entry(*grid)
            .or_insert_with(|| Genome::for_grid(grid, initial_score))
    }

    /// Store `genome` under `grid`, replacing any previous entry
    pub fn insert(&mut self, grid: Grid, genome: Genome) -> Option<Genome> {
        self.entries.insert(grid, genome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Grid, &Genome)> + '_ {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for GenomeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{Move, canonicalize};

    #[test]
    fn new_genome_scores_only_empty_cells() {
        let grid = Grid::from_string("X...O....").unwrap();
        let genome = Genome::for_grid(&grid, 100);
        assert_eq!(genome.score(0), 0);
        assert_eq!(genome.score(4), 0);
        assert_eq!(genome.score(1), 100);
        assert_eq!(genome.total(), 700);
    }

    #[test]
    fn get_or_create_is_lazy_and_stable() {
        let mut store = GenomeStore::with_initial_score(50);
        let grid = Grid::empty();
        assert!(!store.contains(&grid));

        let total = store.get_or_create(&grid).total();
        assert_eq!(total, 450);
        assert!(store.contains(&grid));

        let mut changed = *store.get_or_create(&grid);
        changed.set_score(4, 7);
        store.insert(grid, changed);
        assert_eq!(store.get_or_create(&grid).score(4), 7);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn to_raw_follows_the_board_orientation() {
        // A raw board whose canonical form needs a non-trivial symmetry
        let raw = Grid::from_string("X........").unwrap();
        let canonical = canonicalize(&raw, Move::new(0, 0));
        assert_ne!(canonical.symmetry.rotation, 0);

        let mut scores = [0; 9];
        for (i, s) in scores.iter_mut().enumerate() {
            *s = i as i64 + 1;
        }
        let genome = Genome::from_scores(scores);
        let raw_genome = genome.to_raw(canonical.symmetry);
        for index in 0..9 {
            let canonical_index = canonical.symmetry.apply_index(index);
            assert_eq!(raw_genome.score(index), genome.score(canonical_index));
        }
    }

    #[test]
    fn display_is_space_separated() {
        let genome = Genome::from_scores([100, 0, 97, 1, 2, 3, 4, 5, 6]);
        assert_eq!(genome.to_string(), "100 0 97 1 2 3 4 5 6");
    }
}
