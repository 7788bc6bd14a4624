//! Which listed entries are worth scanning.
//!
//! Directories, source files and empty files never take part in a scan.
//! The decision is made from [`FileInfo`] alone so that it can be applied
//! to any backend's `stat` result.

use crate::FileInfo;
use std::ffi::OsStr;

/// Why an entry was accepted or turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    Directory,
    SourceFile,
    Empty,
}
impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Eligibility rules for scan candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eligibility {
    /// Extensions (without the leading dot) that mark a file as source code.
    source_extensions: Vec<String>,
}
impl Eligibility {
    pub fn new(source_extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let source_extensions = source_extensions
            .into_iter()
            .map(Into::into)
            .map(|ext: String| ext.trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { source_extensions }
    }

    pub fn source_extensions(&self) -> &[String] {
        &self.source_extensions
    }

    fn is_source(&self, extension: Option<&OsStr>) -> bool {
        extension
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.source_extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }

    /// Checks are ordered the same way they are cheapest to answer: the
    /// entry kind first, then the name, then the size.
    pub fn verdict(&self, info: &FileInfo) -> Verdict {
        if info.is_dir() {
            Verdict::Directory
        } else if self.is_source(info.path.extension()) {
            Verdict::SourceFile
        } else if info.is_empty() {
            Verdict::Empty
        } else {
            Verdict::Eligible
        }
    }
}
impl Default for Eligibility {
    fn default() -> Self {
        Self::new(["go"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file(path: &str, size: u64) -> FileInfo {
        FileInfo::file(path, size)
    }

    #[rstest]
    #[case(file("a.txt", 3), Verdict::Eligible)]
    #[case(file("noext", 1), Verdict::Eligible)]
    #[case(file("main.go", 10), Verdict::SourceFile)]
    #[case(file("MAIN.GO", 10), Verdict::SourceFile)]
    #[case(file("main.go", 0), Verdict::SourceFile)]
    #[case(file("empty.txt", 0), Verdict::Empty)]
    #[case(FileInfo::directory("data"), Verdict::Directory)]
    fn test_default_rules(#[case] info: FileInfo, #[case] expected: Verdict) {
        assert_eq!(Eligibility::default().verdict(&info), expected);
    }

    #[test]
    fn test_extension_only_matches_whole_extension() {
        // "archive.gob" is not a Go source file even though it contains ".go".
        assert_eq!(Eligibility::default().verdict(&file("archive.gob", 4)), Verdict::Eligible);
    }

    #[test]
    fn test_custom_extensions_are_normalised() {
        let rules = Eligibility::new([".RS", "py", ""]);
        assert_eq!(rules.source_extensions(), ["rs", "py"]);
        assert_eq!(rules.verdict(&file("lib.rs", 4)), Verdict::SourceFile);
        assert_eq!(rules.verdict(&file("main.go", 4)), Verdict::Eligible);
    }
}
