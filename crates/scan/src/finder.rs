use crate::column::{ColumnScanner, MatchPositions, SENTINEL, SearchWord};
use crate::error::{ErrorKind, Result};
use crate::set::ScanSet;
use std::io::Read;
use tracing::instrument;

/// The earliest column holding the target letter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Zero-based code point offset shared by all matching files.
    pub column: usize,
    pub word: SearchWord,
    /// Every file holding the target letter in `column`, in set order.
    pub positions: MatchPositions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Found(Match),
    /// Every file was read to the end without meeting the target letter.
    /// `columns` is the number of columns that were scanned.
    NoMatch { columns: usize },
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Drives a [`ColumnScanner`] until a column contains the target letter.
///
/// The search is column-major: it stops at the first column where *any*
/// file has the letter. A file whose only occurrence is in a later column
/// is never reported, even though it does contain the letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchFinder {
    target: char,
}

impl MatchFinder {
    /// The target cannot be [`SENTINEL`]; exhausted files would match it.
    pub fn new(target: char) -> Result<Self> {
        if target == SENTINEL {
            exn::bail!(ErrorKind::SentinelTarget(target));
        }
        Ok(Self { target })
    }

    pub fn target(&self) -> char {
        self.target
    }

    #[instrument(skip_all, fields(files = set.len(), target = %self.target))]
    pub fn find<R: Read>(&self, set: &mut ScanSet<R>) -> Result<Outcome> {
        let mut scanner = ColumnScanner::new(set);
        loop {
            let column = scanner.column();
            let word = scanner.step()?;
            if word.is_empty() {
                tracing::debug!(columns = column, "Every file exhausted without a match");
                return Ok(Outcome::NoMatch { columns: column });
            }
            tracing::trace!(column, word = %word, "Scanned column");
            if word.contains(self.target) {
                let positions = word.positions(self.target);
                tracing::debug!(column, matches = positions.len(), "Found target letter");
                return Ok(Outcome::Found(Match { column, word, positions }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileHandle;
    use rstest::rstest;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn set(files: &[(&str, &str)]) -> ScanSet<Cursor<Vec<u8>>> {
        files.iter().map(|(id, text)| FileHandle::new(*id, Cursor::new(text.as_bytes().to_vec()))).collect()
    }

    fn matched(files: &[(&str, &str)]) -> Option<(usize, Vec<PathBuf>)> {
        let mut scan_set = set(files);
        match MatchFinder::new('A').unwrap().find(&mut scan_set).unwrap() {
            Outcome::Found(found) => Some((found.column, scan_set.resolve(&found.positions))),
            Outcome::NoMatch { .. } => None,
        }
    }

    fn paths(ids: &[&str]) -> Vec<PathBuf> {
        ids.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_match_in_first_column() {
        let found = matched(&[("AB", "AB"), ("BA", "BA"), ("BB", "BB")]);
        assert_eq!(found, Some((0, paths(&["AB"]))));
    }

    #[test]
    fn test_match_in_later_column() {
        let found = matched(&[("x", "BB"), ("y", "BA"), ("z", "BB")]);
        assert_eq!(found, Some((1, paths(&["y"]))));
    }

    #[test]
    fn test_every_file_in_the_column_is_reported() {
        let found = matched(&[("a", "xA"), ("b", "yy"), ("c", "zA"), ("d", "Az")]);
        assert_eq!(found, Some((0, paths(&["d"]))));
        let found = matched(&[("a", "xA"), ("b", "yy"), ("c", "zA")]);
        assert_eq!(found, Some((1, paths(&["a", "c"]))));
    }

    // Only the earliest column counts: "late.txt" contains the letter but
    // in a column after one that already matched, so it is never reported.
    #[test]
    fn test_later_occurrences_are_not_reported() {
        let found = matched(&[("early.txt", "xA"), ("late.txt", "xxxA")]);
        assert_eq!(found, Some((1, paths(&["early.txt"]))));
    }

    #[test]
    fn test_short_file_matches_before_exhausting() {
        let found = matched(&[("long", "bbbbA"), ("short", "bA")]);
        assert_eq!(found, Some((1, paths(&["short"]))));
    }

    #[test]
    fn test_exhausted_file_does_not_match() {
        // Columns 1..4 carry the sentinel for "short".
        let found = matched(&[("long", "bbbbA"), ("short", "b")]);
        assert_eq!(found, Some((4, paths(&["long"]))));
    }

    #[rstest]
    #[case(&[])]
    #[case(&[("a", "xyz"), ("b", "abc")])]
    #[case(&[("a", "")])]
    fn test_no_match(#[case] files: &[(&str, &str)]) {
        assert_eq!(matched(files), None);
    }

    #[test]
    fn test_no_match_counts_columns() {
        let mut scan_set = set(&[("a", "xyz"), ("b", "q")]);
        let outcome = MatchFinder::new('A').unwrap().find(&mut scan_set).unwrap();
        assert_eq!(outcome, Outcome::NoMatch { columns: 3 });
    }

    #[test]
    fn test_multibyte_target() {
        let mut scan_set = set(&[("a", "ab"), ("b", "aé")]);
        let Outcome::Found(found) = MatchFinder::new('é').unwrap().find(&mut scan_set).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(found.column, 1);
        assert_eq!(found.word.to_string(), "bé");
        assert_eq!(found.positions.as_slice(), [1]);
    }

    #[test]
    fn test_rescanning_fresh_set_is_deterministic() {
        let files = [("a", "xxA"), ("b", "xAx"), ("c", "Axx")];
        let first = matched(&files);
        let second = matched(&files);
        assert_eq!(first, second);
        assert_eq!(first, Some((0, paths(&["c"]))));
    }

    #[test]
    fn test_sentinel_target_rejected() {
        let err = MatchFinder::new(SENTINEL).unwrap_err();
        assert_eq!(*err, ErrorKind::SentinelTarget('-'));
    }

    #[test]
    fn test_read_error_aborts_scan() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("boom"))
            }
        }
        let mut scan_set: ScanSet<Box<dyn Read>> = ScanSet::new();
        scan_set.push(FileHandle::new("ok", Box::new(Cursor::new(b"xx".to_vec())) as Box<dyn Read>));
        scan_set.push(FileHandle::new("bad", Box::new(Broken) as Box<dyn Read>));
        let err = MatchFinder::new('A').unwrap().find(&mut scan_set).unwrap_err();
        assert_eq!(*err, ErrorKind::Read(PathBuf::from("bad")));
    }
}
