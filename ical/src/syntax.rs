// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Syntax layer for iCalendar streams as defined in RFC 5545, no types.
//!
//! # Architecture
//!
//! ```text
//! Byte Stream → Line Reader → Logical Lines → Lexer → Scanner → Tree Builder → Components
//! ```
//!
//! Every stage is synchronous and owns its own state, so independent streams
//! can be parsed in parallel with independent instances.

pub mod lexer;
pub mod reader;
pub mod scanner;
pub mod tree_builder;

use std::fmt::{self, Display};

pub use crate::syntax::lexer::{Span, SpannedToken, Token, tokenize};
pub use crate::syntax::reader::{LineReader, LogicalLine, ReadError};
pub use crate::syntax::scanner::{
    ContentLine, ContentLineError, ScannedParameter, ScannedParameterValue, scan_content_line,
};
pub use crate::syntax::tree_builder::TreeBuilder;

/// A recoverable problem on a single logical line.
///
/// The line is skipped and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct LineError {
    /// Physical line number (1-based) where the logical line starts
    pub line: usize,
    /// What went wrong
    pub kind: LineErrorKind,
}

/// Kinds of [`LineError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineErrorKind {
    /// The content line does not follow `name *(";" param) ":" value`.
    Malformed {
        /// Tokenizer error
        error: ContentLineError,
        /// The offending logical line
        input: String,
    },

    /// The logical line exceeds the configured maximum length.
    TooLong {
        /// Maximum length in bytes
        limit: usize,
    },

    /// The logical line is not valid UTF-8.
    InvalidUtf8,

    /// A property appeared before any `BEGIN`.
    PropertyOutsideComponent {
        /// Property name
        name: String,
    },
}

impl Display for LineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { error, input } => write!(f, "{error}: {input:?}"),
            Self::TooLong { limit } => write!(f, "logical line exceeds {limit} bytes"),
            Self::InvalidUtf8 => write!(f, "invalid UTF-8"),
            Self::PropertyOutsideComponent { name } => {
                write!(f, "property {name} outside of any component")
            }
        }
    }
}
