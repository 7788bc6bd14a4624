//! Column-synchronised scanning over many character streams.
//!
//! A [`ScanSet`] holds one code point reader per file. Each step of a
//! [`ColumnScanner`] reads exactly one code point from every file, in set
//! order, and assembles the results into a [`SearchWord`]. The
//! [`MatchFinder`] keeps stepping until a search word contains the target
//! letter, which yields the *earliest* column where any file holds it, plus
//! every file holding it in that same column.
//!
//! ```
//! use lockstep_scan::{FileHandle, MatchFinder, Outcome, ScanSet};
//! use std::io::Cursor;
//! use std::path::PathBuf;
//!
//! let mut set: ScanSet<_> = [("a", "BB"), ("b", "BA"), ("c", "AA")]
//!     .into_iter()
//!     .map(|(id, text)| FileHandle::new(id, Cursor::new(text)))
//!     .collect();
//! let Outcome::Found(found) = MatchFinder::new('A').unwrap().find(&mut set).unwrap() else {
//!     panic!("expected a match");
//! };
//! assert_eq!(found.column, 0);
//! assert_eq!(set.resolve(&found.positions), [PathBuf::from("c")]);
//! ```

mod column;
pub mod error;
mod finder;
mod reader;
mod set;

pub use crate::column::{ColumnScanner, MatchPositions, SENTINEL, SearchWord};
pub use crate::finder::{Match, MatchFinder, Outcome};
pub use crate::reader::CodePoints;
pub use crate::set::{FileHandle, ScanSet};
