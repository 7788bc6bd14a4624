use crate::ScanSet;
use crate::error::Result;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Read;

/// Stands in for a file that has no code points left, so that every later
/// column still has one slot per file.
pub const SENTINEL: char = '-';

/// One column across a [`ScanSet`]: slot `i` holds the code point read from
/// file `i`, or [`SENTINEL`] if that file is exhausted.
///
/// An empty word means every file in the set is exhausted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchWord(Vec<char>);

impl SearchWord {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(&letter)
    }

    /// Every slot holding `letter`, left to right.
    pub fn positions(&self, letter: char) -> MatchPositions {
        MatchPositions(
            self.0
                .iter()
                .enumerate()
                .filter_map(|(index, c)| (*c == letter).then_some(index))
                .collect(),
        )
    }
}

impl Display for SearchWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl FromIterator<char> for SearchWord {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Indices into a [`SearchWord`], ascending. Each index is also an index
/// into the [`ScanSet`] the word was read from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchPositions(Vec<usize>);

impl MatchPositions {
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for MatchPositions {
    fn from(mut positions: Vec<usize>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        Self(positions)
    }
}

/// Steps a [`ScanSet`] forward one column at a time.
///
/// Also an [`Iterator`] over the columns, ending at total exhaustion or
/// after the first read error.
pub struct ColumnScanner<'a, R> {
    set: &'a mut ScanSet<R>,
    column: usize,
    done: bool,
}

impl<'a, R: Read> ColumnScanner<'a, R> {
    pub fn new(set: &'a mut ScanSet<R>) -> Self {
        Self { set, column: 0, done: false }
    }

    /// Index of the column the next [`step`](Self::step) will read.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Read one code point from every file, in set order.
    ///
    /// Returns an empty word once every file is exhausted (immediately, for
    /// an empty set). Files are read one after another; a read blocking on
    /// one file blocks the whole step.
    pub fn step(&mut self) -> Result<SearchWord> {
        let mut slots = Vec::with_capacity(self.set.len());
        let mut live = false;
        for handle in self.set.handles_mut() {
            match handle.next_code_point()? {
                Some(c) => {
                    live = true;
                    slots.push(c);
                },
                None => slots.push(SENTINEL),
            }
        }
        if !live {
            return Ok(SearchWord::default());
        }
        self.column += 1;
        Ok(SearchWord(slots))
    }
}

impl<R: Read> Iterator for ColumnScanner<'_, R> {
    type Item = Result<SearchWord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(word) if word.is_empty() => {
                self.done = true;
                None
            },
            Ok(word) => Some(Ok(word)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileHandle;
    use rstest::rstest;
    use std::io::Cursor;

    fn set(contents: &[&str]) -> ScanSet<Cursor<Vec<u8>>> {
        contents
            .iter()
            .enumerate()
            .map(|(i, text)| FileHandle::new(format!("{i}.txt"), Cursor::new(text.as_bytes().to_vec())))
            .collect()
    }

    fn columns(contents: &[&str]) -> Vec<String> {
        let mut scan_set = set(contents);
        ColumnScanner::new(&mut scan_set).map(|word| word.unwrap().to_string()).collect()
    }

    #[test]
    fn test_columns_read_one_code_point_per_file() {
        assert_eq!(columns(&["AB", "BA", "BB"]), ["ABB", "BAB"]);
    }

    #[test]
    fn test_short_file_is_padded_with_sentinel() {
        assert_eq!(columns(&["ABC", "x", "12"]), ["Ax1", "B-2", "C--"]);
    }

    #[test]
    fn test_multibyte_code_points_take_one_slot() {
        assert_eq!(columns(&["éA", "€"]), ["é€", "A-"]);
    }

    #[rstest]
    #[case(&["AB", "BA", "BB"])]
    #[case(&["ABC", "x", "12345"])]
    #[case(&["🦀", "ab", ""])]
    fn test_word_length_matches_set_until_exhausted(#[case] contents: &[&str]) {
        let mut scan_set = set(contents);
        let mut scanner = ColumnScanner::new(&mut scan_set);
        let longest = contents.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        for column in 0..longest {
            assert_eq!(scanner.column(), column);
            let word = scanner.step().unwrap();
            assert_eq!(word.len(), contents.len());
        }
        assert!(scanner.step().unwrap().is_empty());
        // Exhaustion sticks.
        assert!(scanner.step().unwrap().is_empty());
        assert_eq!(scanner.column(), longest);
    }

    #[test]
    fn test_empty_set_is_exhausted_immediately() {
        let mut scan_set = set(&[]);
        let mut scanner = ColumnScanner::new(&mut scan_set);
        assert_eq!(scanner.step().unwrap(), SearchWord::default());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_positions_report_every_slot() {
        let word: SearchWord = "AxA-A".chars().collect();
        assert_eq!(word.positions('A').as_slice(), [0, 2, 4]);
        assert!(word.positions('z').is_empty());
        assert!(word.contains('-'));
    }

    #[test]
    fn test_positions_count_code_points_not_bytes() {
        let word: SearchWord = "éA€A".chars().collect();
        assert_eq!(word.positions('A').as_slice(), [1, 3]);
    }
}
