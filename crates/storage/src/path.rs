//! Path validation for identifiers handed to storage backends.
//!
//! Identifiers arrive from a remote listing, so they are treated as untrusted
//! input: anything that would resolve outside the backend root is rejected.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Normalises a relative storage path and ensures it never leaves the root.
///
/// - `.` components, repeated separators and a trailing `/` (the directory
///   marker used by listings) are dropped.
/// - `..` pops the previous component; popping past the root is an error.
/// - Absolute roots are ignored, drive prefixes and NUL bytes are rejected.
/// - A path that normalises to nothing is rejected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lockstep_storage::validate_path;
///
/// assert_eq!(validate_path("notes.txt").unwrap(), Path::new("notes.txt"));
/// assert_eq!(validate_path("docs/").unwrap(), Path::new("docs"));
/// assert_eq!(validate_path("a/./b/../c.txt").unwrap(), Path::new("a/c.txt"));
/// assert!(validate_path("../secret").is_err());
/// assert!(validate_path("a\0b").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let reject = || exn::Exn::from(ErrorKind::InvalidPath(path.to_path_buf()));
    let mut normalised = PathBuf::new();
    for component in path.components() {
        match component {
            // Null bytes survive Path::components() on Unix but truncate
            // C-based syscalls.
            Component::Normal(part) if part.as_encoded_bytes().contains(&0) => return Err(reject()),
            Component::Normal(part) => normalised.push(part),
            Component::CurDir | Component::RootDir => {},
            Component::ParentDir => {
                if !normalised.pop() {
                    return Err(reject());
                }
            },
            Component::Prefix(_) => return Err(reject()),
        }
    }
    if normalised.as_os_str().is_empty() {
        return Err(reject());
    }
    Ok(normalised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a.txt", "a.txt")]
    #[case("data/a.txt", "data/a.txt")]
    #[case("data//a.txt", "data/a.txt")]
    #[case("./data/./a.txt", "data/a.txt")]
    #[case("data/", "data")]
    #[case("data///", "data")]
    #[case("/a.txt", "a.txt")]
    #[case("data/sub/../a.txt", "data/a.txt")]
    fn test_normalises(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate(input).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("./")]
    #[case("//")]
    #[case("..")]
    #[case("../a.txt")]
    #[case("data/../../a.txt")]
    #[case("a\0b")]
    fn test_rejects(#[case] input: &str) {
        let err = validate(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }
}
