//! Plain-text genome files
//!
//! One entry per line: the 9-character key (`_` for an empty cell, `X`, `O`),
//! a ` : ` separator and the nine scores separated by single spaces:
//!
//! ```text
//! ____X____ : 100 100 100 100 0 100 100 100 100
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use super::store::{Genome, GenomeStore};
use crate::{Error, Result, tictactoe::Grid};

/// A line rejected while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

/// Summary of a completed load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of entries read into the store
    pub entries: usize,
    pub skipped: Vec<SkippedLine>,
}

/// What happened when loading a genome file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read; the store now holds exactly its valid entries
    Loaded(LoadReport),
    /// The file could not be opened; the store was not touched
    Missing,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }

    pub fn report(&self) -> Option<&LoadReport> {
        match self {
            LoadOutcome::Loaded(report) => Some(report),
            LoadOutcome::Missing => None,
        }
    }
}

/// Render one store entry as a file line (without the newline)
pub fn format_line(grid: &Grid, genome: &Genome) -> String {
    format!("{} : {genome}", grid.to_key())
}

/// Parse one file line into a key and its genome
///
/// # Errors
///
/// Returns [`Error::MalformedLine`] if the key is not 9 valid characters,
/// the separator is not `:` or fewer than 9 integer scores follow it.
/// Tokens after the ninth score are ignored.
pub fn parse_line(text: &str, line: usize) -> Result<(Grid, Genome)> {
    let malformed = |reason: String| Error::MalformedLine { line, reason };
    let mut tokens = text.split_whitespace();

    let key = tokens.next().unwrap_or_default();
    if key.chars().count() != 9 {
        return Err(malformed(format!(
            "key '{key}' has {} characters, expected 9",
            key.chars().count()
        )));
    }
    let grid =
        Grid::from_key(key).ok_or_else(|| malformed(format!("key '{key}' has invalid cells")))?;

    match tokens.next() {
        Some(":") => {}
        Some(other) => return Err(malformed(format!("expected ':' separator, found '{other}'"))),
        None => return Err(malformed("missing ':' separator".to_string())),
    }

    let mut scores = [0i64; 9];
    for (i, slot) in scores.iter_mut().enumerate() {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(format!("expected 9 scores, found {i}")))?;
        *slot = token
            .parse()
            .map_err(|_| malformed(format!("score '{token}' is not an integer")))?;
    }

    Ok((grid, Genome::from_scores(scores)))
}

/// Write every entry of `store` to `writer`, one line each, in key order
pub fn write_store<W: Write>(store: &GenomeStore, mut writer: W) -> std::io::Result<()> {
    for (grid, genome) in store.iter() {
        writeln!(writer, "{}", format_line(grid, genome))?;
    }
    writer.flush()
}

/// Replace the contents of `store` with the entries read from `reader`.
///
/// Malformed lines, including lines that are not valid UTF-8, are skipped,
/// reported on stderr and listed in the returned report. Blank lines are
/// ignored. On a read error `store` is left as it was.
pub fn read_store<R: BufRead>(store: &mut GenomeStore, reader: R, source: &str) -> Result<LoadReport> {
    let mut loaded = GenomeStore::with_initial_score(store.initial_score());
    let mut report = LoadReport::default();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let line_no = index + 1;
        let mut bytes = bytes.map_err(|source_err| Error::Io {
            operation: format!("read line {line_no} of {source}"),
            source: source_err,
        })?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let parsed = match String::from_utf8(bytes) {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => parse_line(&text, line_no),
            Err(_) => Err(Error::MalformedLine {
                line: line_no,
                reason: "line is not valid UTF-8".to_string(),
            }),
        };

        match parsed {
            Ok((grid, genome)) => {
                loaded.insert(grid, genome);
            }
            Err(Error::MalformedLine { line, reason }) => {
                eprintln!("[genome] skipping malformed line {line} in {source}: {reason}");
                report.skipped.push(SkippedLine { line, reason });
            }
            Err(other) => return Err(other),
        }
    }

    report.entries = loaded.len();
    *store = loaded;
    Ok(report)
}

/// Save `store` to `path`
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn save<P: AsRef<Path>>(store: &GenomeStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create genome file {}", path.display()),
        source,
    })?;
    write_store(store, BufWriter::new(file)).map_err(|source| Error::Io {
        operation: format!("write genome file {}", path.display()),
        source,
    })
}

/// Load `path` into `store`.
///
/// A file that cannot be opened is not an error: the store keeps its current
/// contents and [`LoadOutcome::Missing`] is returned. Otherwise the store is
/// cleared and refilled from the file.
pub fn load<P: AsRef<Path>>(store: &mut GenomeStore, path: P) -> Result<LoadOutcome> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!(
                "[genome] could not open {} ({err}); starting with empty genomes",
                path.display()
            );
            return Ok(LoadOutcome::Missing);
        }
    };

    let report = read_store(store, BufReader::new(file), &path.display().to_string())?;
    Ok(LoadOutcome::Loaded(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_matches_file_layout() {
        let grid = Grid::from_string("X...O....").unwrap();
        let genome = Genome::for_grid(&grid, 100);
        assert_eq!(
            format_line(&grid, &genome),
            "X___O____ : 0 100 100 100 0 100 100 100 100"
        );
    }

    #[test]
    fn parse_accepts_formatted_line() {
        let (grid, genome) =
            parse_line("_X_O_____ : 100 0 97 0 100 100 100 100 1", 1).unwrap();
        assert_eq!(grid, Grid::from_string(".X.O.....").unwrap());
        assert_eq!(genome.scores(), &[100, 0, 97, 0, 100, 100, 100, 100, 1]);
    }

    #[test]
    fn parse_rejects_short_key() {
        let err = parse_line("X___O___ : 0 100 100 100 0 100 100 100 100", 4).unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 4, .. }));
    }

    #[test]
    fn parse_rejects_bad_separator_and_short_scores() {
        assert!(parse_line("X___O____ - 0 100 100 100 0 100 100 100 100", 1).is_err());
        assert!(parse_line("X___O____ : 0 100 100", 1).is_err());
        assert!(parse_line("X___O____ : 0 100 100 x 0 100 100 100 100", 1).is_err());
        assert!(parse_line("X___Q____ : 0 100 100 100 0 100 100 100 100", 1).is_err());
    }

    #[test]
    fn parse_ignores_trailing_tokens() {
        let (_, genome) = parse_line("_________ : 1 2 3 4 5 6 7 8 9 10", 1).unwrap();
        assert_eq!(genome.total(), 45);
    }

    #[test]
    fn read_store_replaces_existing_entries() {
        let mut store = GenomeStore::new();
        store.get_or_create(&Grid::from_string("X........").unwrap());

        let text = "_________ : 1 1 1 1 1 1 1 1 1\n\nbogus\n";
        let report = read_store(&mut store, text.as_bytes(), "memory").unwrap();
        assert_eq!(report.entries, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&Grid::empty()));
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut text = b"_________ : 1 1 1 1 1 1 1 1 1\n".to_vec();
        text.extend_from_slice(b"X\xff_______ : 1 1 1 1 1 1 1 1 1\n");
        text.extend_from_slice(b"X________ : 0 1 1 1 1 1 1 1 1\r\n");

        let mut store = GenomeStore::new();
        let report = read_store(&mut store, text.as_slice(), "memory").unwrap();
        assert_eq!(report.entries, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 2);
        assert!(store.contains(&Grid::empty()));
        assert!(store.contains(&Grid::from_string("X........").unwrap()));
    }

    #[test]
    fn read_error_keeps_the_previous_store() {
        struct Failing;
        impl std::io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk gone"))
            }
        }

        let mut store = GenomeStore::new();
        store.get_or_create(&Grid::empty());
        let result = read_store(&mut store, std::io::BufReader::new(Failing), "memory");
        assert!(matches!(result, Err(Error::Io { .. })));
        assert_eq!(store.len(), 1);
    }
}
