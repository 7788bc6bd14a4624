//! One code point at a time, out of any byte stream.

use std::io::{ErrorKind as IoErrorKind, Read, Result as IoResult};

/// Yields one Unicode code point per call to
/// [`next_code_point`](Self::next_code_point).
///
/// Malformed UTF-8 does not stop the stream: an invalid lead byte, or a
/// sequence that doesn't decode, produces U+FFFD and advances by a single
/// byte, so the following byte gets its own chance to start a code point.
///
/// Once the underlying reader reports end of stream the reader is
/// exhausted for good; it never touches the inner reader again.
pub struct CodePoints<R> {
    inner: R,
    /// Bytes read from `inner` but not yet consumed (at most 4).
    pending: Vec<u8>,
    exhausted: bool,
}

impl<R: Read> CodePoints<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(4),
            exhausted: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Top up `pending` to `wanted` bytes, or fewer if the stream ends first.
    fn fill(&mut self, wanted: usize) -> IoResult<()> {
        let mut byte = [0u8; 1];
        while self.pending.len() < wanted {
            match self.inner.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => self.pending.push(byte[0]),
                Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Advance by exactly one code point. `Ok(None)` means exhausted.
    pub fn next_code_point(&mut self) -> IoResult<Option<char>> {
        if self.exhausted {
            return Ok(None);
        }
        self.fill(1)?;
        let Some(&lead) = self.pending.first() else {
            self.exhausted = true;
            return Ok(None);
        };
        let width = utf8_width(lead);
        if width > 1 {
            self.fill(width)?;
        }
        let decoded = match width {
            0 => None,
            _ => self
                .pending
                .get(..width)
                .and_then(|bytes| std::str::from_utf8(bytes).ok())
                .and_then(|s| s.chars().next()),
        };
        Ok(Some(match decoded {
            Some(c) => {
                self.pending.drain(..width);
                c
            },
            None => {
                self.pending.remove(0);
                char::REPLACEMENT_CHARACTER
            },
        }))
    }
}

/// Encoded length implied by a UTF-8 lead byte, or 0 if it cannot lead.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
