// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Line reader that unfolds physical lines into logical content lines.
//!
//! Per RFC 5545 Section 3.1, a long content line may be split across physical
//! lines by inserting a line break followed by a single SPACE or HTAB. The
//! reader removes the line break and that one whitespace octet.
//!
//! Unfolding works on bytes before UTF-8 decoding, because a fold may split a
//! multi-byte sequence.

use std::io::{self, BufRead};

use crate::syntax::{LineError, LineErrorKind};

/// One unfolded content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Line content without terminators and fold markers
    pub text: String,
    /// Physical line number (1-based) where this logical line starts
    pub line: usize,
}

/// Errors that can occur while reading logical lines.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The underlying stream failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// The logical line is longer than the configured limit.
    ///
    /// The rest of the line has been consumed, the reader can continue.
    #[error("line {line}: logical line exceeds {limit} bytes")]
    LineTooLong {
        /// Physical line number where the logical line starts
        line: usize,
        /// Maximum length in bytes
        limit: usize,
    },

    /// The logical line is not valid UTF-8. The reader can continue.
    #[error("line {line}: invalid UTF-8")]
    InvalidUtf8 {
        /// Physical line number where the logical line starts
        line: usize,
    },
}

impl ReadError {
    /// Convert a per-line error into a [`LineError`], or give back a fatal one.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, which cannot be recovered from.
    pub fn into_line_error(self) -> Result<LineError, io::Error> {
        match self {
            Self::Io(err) => Err(err),
            Self::LineTooLong { line, limit } => Ok(LineError {
                line,
                kind: LineErrorKind::TooLong { limit },
            }),
            Self::InvalidUtf8 { line } => Ok(LineError {
                line,
                kind: LineErrorKind::InvalidUtf8,
            }),
        }
    }
}

/// Reads logical lines from a buffered byte stream.
///
/// The sequence is lazy, finite and not restartable. The scratch buffer is
/// private to the instance and reused between lines.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    physical_lines: usize,
    max_line_length: Option<usize>,
}

impl<R: BufRead> LineReader<R> {
    /// Create a reader without a line length limit.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            physical_lines: 0,
            max_line_length: None,
        }
    }

    /// Set the maximum length of a logical line in bytes.
    ///
    /// - `None`: the buffer grows as needed
    /// - `Some(n)`: longer lines are skipped with [`ReadError::LineTooLong`]
    #[must_use]
    pub fn with_max_line_length(mut self, limit: Option<usize>) -> Self {
        self.max_line_length = limit;
        self
    }

    /// Number of physical lines consumed so far.
    #[must_use]
    pub const fn physical_lines(&self) -> usize {
        self.physical_lines
    }

    /// Consumes this reader, returning the underlying stream.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read the next logical line.
    ///
    /// Returns `Ok(None)` at end of stream. An empty logical line is returned
    /// as `Ok(Some(..))` with empty text.
    ///
    /// # Errors
    ///
    /// See [`ReadError`]; only [`ReadError::Io`] leaves the reader unusable.
    pub fn read_line(&mut self) -> Result<Option<LogicalLine>, ReadError> {
        self.buf.clear();
        let line = self.physical_lines + 1;
        let mut overflow = false;

        if !self.read_physical(&mut overflow)? {
            return Ok(None);
        }

        while self.next_is_fold()? {
            self.inner.consume(1); // fold marker
            if !self.read_physical(&mut overflow)? {
                break;
            }
        }

        if let (true, Some(limit)) = (overflow, self.max_line_length) {
            return Err(ReadError::LineTooLong { line, limit });
        }

        match std::str::from_utf8(&self.buf) {
            Ok(text) => Ok(Some(LogicalLine {
                text: text.to_owned(),
                line,
            })),
            Err(_) => Err(ReadError::InvalidUtf8 { line }),
        }
    }

    /// Append one physical line to the buffer, without its terminator.
    ///
    /// Returns `false` if the stream was already at its end.
    fn read_physical(&mut self, overflow: &mut bool) -> io::Result<bool> {
        let limit = self.max_line_length;
        let mut read_any = false;
        // CR ending an unfinished chunk, content unless the next byte is LF
        let mut pending_cr = false;

        loop {
            let available = fill_buf(&mut self.inner)?;
            if available.is_empty() {
                break;
            }
            read_any = true;

            let (used, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            };
            let (chunk, _) = available.split_at(used);
            let chunk = if done {
                chunk.strip_suffix(b"\n").unwrap_or(chunk)
            } else {
                chunk
            };

            if std::mem::take(&mut pending_cr) && !(done && chunk.is_empty()) {
                append(&mut self.buf, limit, overflow, b"\r");
            }

            let chunk = match chunk.strip_suffix(b"\r") {
                Some(rest) if done => rest,
                Some(rest) => {
                    pending_cr = true;
                    rest
                }
                None => chunk,
            };
            append(&mut self.buf, limit, overflow, chunk);

            self.inner.consume(used);
            if done {
                break;
            }
        }

        if pending_cr {
            append(&mut self.buf, limit, overflow, b"\r");
        }
        if read_any {
            self.physical_lines += 1;
        }
        Ok(read_any)
    }

    fn next_is_fold(&mut self) -> io::Result<bool> {
        let available = fill_buf(&mut self.inner)?;
        Ok(matches!(available.first(), Some(b' ' | b'\t')))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<LogicalLine, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

/// Extend `buf` unless that would exceed `limit`, after which nothing more is kept.
fn append(buf: &mut Vec<u8>, limit: Option<usize>, overflow: &mut bool, bytes: &[u8]) {
    match limit {
        _ if *overflow => {}
        Some(limit) if buf.len() + bytes.len() > limit => *overflow = true,
        _ => buf.extend_from_slice(bytes),
    }
}

fn fill_buf<R: BufRead>(inner: &mut R) -> io::Result<&[u8]> {
    loop {
        match inner.fill_buf() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    // already buffered, returns without touching the stream
    inner.fill_buf()
}
