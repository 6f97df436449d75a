// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lexer for logical iCalendar content lines as defined in RFC 5545

use std::fmt::{self, Display};
use std::ops::Range;

use logos::Logos;

/// Tokenize one logical content line into a sequence of `SpannedToken`
///
/// The input must already be unfolded, see [`crate::syntax::LineReader`].
pub fn tokenize(line: &str) -> impl Iterator<Item = SpannedToken<'_>> {
    Token::lexer(line).spanned().map(|(tok, span)| match tok {
        Ok(tok) => SpannedToken(tok, Span::new(span.start, span.end)),
        Err(()) => SpannedToken(Token::Error, Span::new(span.start, span.end)),
    })
}

/// Token emitted by the content line lexer
///
/// Only the delimiters of `contentline = name *(";" param) ":" value` are
/// distinguished; everything between them is `Text`.
#[derive(PartialEq, Eq, Clone, Copy, Logos)]
pub enum Token<'a> {
    /// Double Quote ("), decimal codepoint 22
    #[token(r#"""#)]
    DQuote,

    /// Comma (,), decimal codepoint 44
    #[token(",")]
    Comma,

    /// Colon (:), decimal codepoint 58
    #[token(":")]
    Colon,

    /// Semicolon (;), decimal codepoint 59
    #[token(";")]
    Semicolon,

    /// Equal sign (=), decimal codepoint 61
    #[token("=")]
    Equal,

    /// Any run of characters that are not delimiters, including NON-US-ASCII
    #[regex(r#"[^",:;=]+"#)]
    Text(&'a str),

    /// Error token for lexing errors
    Error,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DQuote => write!(f, "DQuote"),
            Self::Comma => write!(f, "Comma"),
            Self::Colon => write!(f, "Colon"),
            Self::Semicolon => write!(f, "Semicolon"),
            Self::Equal => write!(f, "Equal"),
            Self::Text(s) => write!(f, "Text({s})"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A token with its associated span in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'src>(pub Token<'src>, pub Span);

impl Display for SpannedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.0, self.1)
    }
}

/// Byte range within a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start offset, inclusive
    pub start: usize,
    /// End offset, exclusive
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Convert to a `Range` usable for slicing.
    #[must_use]
    pub const fn into_range(self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::Token::*;
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        tokenize(src).map(|SpannedToken(tok, _)| tok).collect()
    }

    #[test]
    fn tokenizes_delimiters() {
        assert_eq!(
            tokens(r#"",:;="#),
            [DQuote, Comma, Colon, Semicolon, Equal]
        );
    }

    #[test]
    fn tokenizes_content_line() {
        assert_eq!(
            tokens("DTSTART;TZID=America/New_York:20250101T090000"),
            [
                Text("DTSTART"),
                Semicolon,
                Text("TZID"),
                Equal,
                Text("America/New_York"),
                Colon,
                Text("20250101T090000"),
            ]
        );
    }

    #[test]
    fn tokenizes_unicode_and_whitespace_as_text() {
        assert_eq!(
            tokens("SUMMARY:Café \t 会议"),
            [Text("SUMMARY"), Colon, Text("Café \t 会议")]
        );
    }

    #[test]
    fn tokenizes_with_spans() {
        let spanned: Vec<_> = tokenize(r#"A;B="x""#).collect();
        assert_eq!(
            spanned,
            [
                SpannedToken(Text("A"), Span::new(0, 1)),
                SpannedToken(Semicolon, Span::new(1, 2)),
                SpannedToken(Text("B"), Span::new(2, 3)),
                SpannedToken(Equal, Span::new(3, 4)),
                SpannedToken(DQuote, Span::new(4, 5)),
                SpannedToken(Text("x"), Span::new(5, 6)),
                SpannedToken(DQuote, Span::new(6, 7)),
            ]
        );
    }

    #[test]
    fn tokenizes_empty_line() {
        assert!(tokens("").is_empty());
    }
}
