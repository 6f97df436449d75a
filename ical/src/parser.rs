// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, BufRead};

use crate::component::{Component, Document};
use crate::syntax::{LineError, LineReader, LogicalLine, TreeBuilder};

/// Parse a whole iCalendar stream into a [`Document`].
///
/// Malformed lines are skipped and reported in [`Document::diagnostics`];
/// structural errors abort the parse.
///
/// ## Errors
///
/// Returns a [`ParseError`] on I/O failure or unrecoverable nesting problems.
///
/// ## Examples
///
/// ```
/// # use cical_ical::{ParseOptions, parse};
/// let src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// SUMMARY:Test Event\r\n\
/// END:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// ";
/// let document = parse(src.as_bytes(), ParseOptions::default()).unwrap();
/// assert_eq!(document.components.len(), 1);
/// ```
///
/// An `END` without a matching `BEGIN` is fatal:
///
/// ```
/// # use cical_ical::{ParseError, ParseOptions, parse};
/// let src = "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\nEND:VEVENT\r\n";
/// let err = parse(src.as_bytes(), ParseOptions::default()).unwrap_err();
/// assert!(matches!(err, ParseError::UnbalancedEnd { line: 3, .. }));
/// ```
pub fn parse<R: BufRead>(reader: R, options: ParseOptions) -> Result<Document, ParseError> {
    let mut lines = LineReader::new(reader).with_max_line_length(options.max_line_length);
    let mut builder = TreeBuilder::new(options);
    let mut components = Vec::new();

    while let Some(line) = next_line(&mut lines, &mut builder)? {
        components.extend(builder.push_line(&line)?);
    }

    let diagnostics = builder.finish()?;
    tracing::debug!(
        components = components.len(),
        diagnostics = diagnostics.len(),
        "parsed document"
    );
    Ok(Document {
        components,
        diagnostics,
    })
}

/// Parse an in-memory iCalendar string with default options.
///
/// ## Errors
///
/// Same as [`parse`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    parse(src.as_bytes(), ParseOptions::default())
}

/// Read the next usable logical line, recording per-line read errors.
fn next_line<R: BufRead>(
    lines: &mut LineReader<R>,
    builder: &mut TreeBuilder,
) -> Result<Option<LogicalLine>, ParseError> {
    loop {
        match lines.read_line() {
            Ok(line) => return Ok(line),
            Err(err) => builder.skip(err.into_line_error()?),
        }
    }
}

/// Options controlling the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject an `END` whose name differs from the open component.
    pub strict_nesting: bool,
    /// Maximum logical line length in bytes, `None` for unbounded.
    pub max_line_length: Option<usize>,
    /// Maximum component nesting depth, `None` for unbounded.
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_nesting: false,
            max_line_length: None,
            max_depth: Some(Self::DEFAULT_MAX_DEPTH),
        }
    }
}

impl ParseOptions {
    /// Default value of [`ParseOptions::max_depth`].
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Set [`ParseOptions::strict_nesting`].
    #[must_use]
    pub const fn strict_nesting(mut self, strict: bool) -> Self {
        self.strict_nesting = strict;
        self
    }

    /// Set [`ParseOptions::max_line_length`].
    #[must_use]
    pub const fn max_line_length(mut self, limit: Option<usize>) -> Self {
        self.max_line_length = limit;
        self
    }

    /// Set [`ParseOptions::max_depth`].
    #[must_use]
    pub const fn max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }
}

/// Streaming parser over a byte stream.
///
/// Yields each top-level component as soon as its `END` line is read. After
/// the first error the iterator is exhausted.
///
/// ```
/// # use cical_ical::{ParseOptions, Parser};
/// let src = "BEGIN:VCALENDAR\nEND:VCALENDAR\nBEGIN:VCALENDAR\nEND:VCALENDAR\n";
/// let parser = Parser::new(src.as_bytes(), ParseOptions::default());
/// assert_eq!(parser.filter_map(Result::ok).count(), 2);
/// ```
#[derive(Debug)]
pub struct Parser<R> {
    lines: LineReader<R>,
    builder: TreeBuilder,
    done: bool,
}

impl<R: BufRead> Parser<R> {
    /// Create a streaming parser.
    #[must_use]
    pub fn new(reader: R, options: ParseOptions) -> Self {
        Self {
            lines: LineReader::new(reader).with_max_line_length(options.max_line_length),
            builder: TreeBuilder::new(options),
            done: false,
        }
    }

    /// Recoverable problems seen so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[LineError] {
        self.builder.diagnostics()
    }

    fn advance(&mut self) -> Result<Option<Component>, ParseError> {
        while let Some(line) = next_line(&mut self.lines, &mut self.builder)? {
            if let Some(component) = self.builder.push_line(&line)? {
                return Ok(Some(component));
            }
        }
        self.builder.ensure_closed()?;
        Ok(None)
    }
}

impl<R: BufRead> Iterator for Parser<R> {
    type Item = Result<Component, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.advance() {
            Ok(Some(component)) => Some(Ok(component)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for Parser<R> {}

/// Fatal errors that abort a parse.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The underlying stream failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// Unmatched END (no corresponding BEGIN)
    #[error("line {line}: unmatched END:{name} (no corresponding BEGIN)")]
    UnbalancedEnd {
        /// Component name that was being closed
        name: String,
        /// Line of the END
        line: usize,
    },

    /// Input ended while a component was still open
    #[error("line {line}: unmatched BEGIN:{name} (component not closed)")]
    UnterminatedComponent {
        /// Innermost open component
        name: String,
        /// Line of its BEGIN
        line: usize,
    },

    /// Mismatched BEGIN/END names, only raised with strict nesting
    #[error("line {line}: mismatched nesting: expected END:{expected}, found END:{found}")]
    MismatchedEnd {
        /// Name of the open component
        expected: String,
        /// Name found on the END line
        found: String,
        /// Line of the END
        line: usize,
    },

    /// Too many nested components
    #[error("line {line}: components nested deeper than {limit}")]
    NestingTooDeep {
        /// Configured limit
        limit: usize,
        /// Line of the BEGIN that exceeded it
        line: usize,
    },
}
