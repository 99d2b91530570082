//! Per-source read cursor
//!
//! A cursor holds one open reader plus the lookahead value that has been read
//! but not yet emitted. Construction performs the first read, so a `Cursor`
//! that exists is always active. `advance` consumes the cursor and hands it
//! back only if another value was read; otherwise the reader is dropped
//! (closing the underlying handle) before `advance` returns.

use std::io::BufRead;

use crate::error::{MergeError, Result};

/// Upper bound on the significant part of a token. Anything longer cannot be an i64.
const MAX_TOKEN_LEN: usize = 64;

#[derive(Debug)]
pub struct Cursor<R> {
    reader: R,
    current: i64,
    source_id: String,
    ordinal: usize,
    values_read: u64,
}

/// Result of `Cursor::advance`
#[derive(Debug)]
pub enum Advance<R> {
    /// Next value read, cursor is still active
    Active(Cursor<R>),
    /// Source ended; the reader has already been released
    Exhausted(Exhausted),
}

/// What is left of a cursor after its reader has been released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhausted {
    pub source_id: String,
    pub ordinal: usize,
    pub values_read: u64,
    /// Set when the source stopped on something other than a clean end of data
    pub failure: Option<String>,
}

impl<R: BufRead> Cursor<R> {
    /// Open a cursor over `reader` and read its first value.
    ///
    /// `ordinal` is the source's position in enumeration order and breaks
    /// ties between equal values. On failure the reader is dropped before
    /// returning.
    pub fn open(source_id: impl Into<String>, ordinal: usize, mut reader: R) -> Result<Self> {
        let source_id = source_id.into();
        match read_value(&mut reader) {
            Ok(Some(current)) => Ok(Self {
                reader,
                current,
                source_id,
                ordinal,
                values_read: 1,
            }),
            Ok(None) => Err(MergeError::EmptySource { source_id }),
            Err(reason) => Err(MergeError::SourceRead { source_id, reason }),
        }
    }

    /// Read the next value from the source.
    pub fn advance(mut self) -> Advance<R> {
        match read_value(&mut self.reader) {
            Ok(Some(value)) => {
                self.current = value;
                self.values_read += 1;
                Advance::Active(self)
            }
            Ok(None) => Advance::Exhausted(self.retire(None)),
            Err(reason) => Advance::Exhausted(self.retire(Some(reason))),
        }
    }
}

impl<R> Cursor<R> {
    pub fn peek(&self) -> i64 {
        self.current
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Values read so far, including the one currently held
    pub fn values_read(&self) -> u64 {
        self.values_read
    }

    fn retire(self, failure: Option<String>) -> Exhausted {
        let Cursor {
            reader,
            source_id,
            ordinal,
            values_read,
            ..
        } = self;
        drop(reader);
        Exhausted {
            source_id,
            ordinal,
            values_read,
            failure,
        }
    }
}

/// Read one whitespace-delimited token and parse it as i64.
///
/// `Ok(None)` is a clean end of data. Malformed tokens and I/O errors come
/// back as `Err` with a human-readable reason. Runs of leading zeros after an
/// optional sign collapse to one zero while scanning, so padding does not
/// count toward `MAX_TOKEN_LEN`.
fn read_value<R: BufRead>(reader: &mut R) -> std::result::Result<Option<i64>, String> {
    let mut token: Vec<u8> = Vec::new();
    let mut seen_any = false;
    let mut oversized = false;

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(format!("I/O error: {}", e)),
        };
        if buf.is_empty() {
            break;
        }

        let mut consumed = 0;
        let mut done = false;
        for &byte in buf {
            consumed += 1;
            if byte.is_ascii_whitespace() {
                if seen_any {
                    done = true;
                    break;
                }
                continue;
            }
            seen_any = true;
            // Collapse a run of leading zeros to a single one
            let leading_zero = matches!(token.as_slice(), [b'0'] | [b'-', b'0'] | [b'+', b'0']);
            if byte == b'0' && leading_zero {
                continue;
            } else if token.len() >= MAX_TOKEN_LEN {
                // Keep consuming so the whole token is dropped
                oversized = true;
            } else {
                token.push(byte);
            }
        }
        reader.consume(consumed);
        if done {
            break;
        }
    }

    if !seen_any {
        return Ok(None);
    }
    if oversized {
        return Err(format!(
            "malformed token starting {:?}",
            String::from_utf8_lossy(&token)
        ));
    }
    std::str::from_utf8(&token)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| format!("malformed token {:?}", String::from_utf8_lossy(&token)))
}
