// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Scanner for iCalendar content lines.
//!
//! This module splits one logical line into name, parameters and value.
//!
//! # Content Line Format
//!
//! Per RFC 5545, a content line has the format:
//! ```text
//! contentline = name *(";" param) ":" value CRLF
//! param       = param-name "=" param-value *("," param-value)
//! ```
//!
//! The scan is a single left-to-right pass over the lexer tokens with a
//! quote-parity flag: after an odd number of `"` the delimiters `:`, `;`, `,`
//! and `=` are literal text.
//!
//! # Example
//!
//! ```
//! use cical_ical::syntax::scan_content_line;
//!
//! let line = scan_content_line(r#"ATTENDEE;MEMBER="mailto:a@example.com":mailto:b@example.com"#).unwrap();
//! assert_eq!(line.name, "ATTENDEE");
//! assert_eq!(line.parameters[0].values[0].value, "mailto:a@example.com");
//! assert_eq!(line.value, "mailto:b@example.com");
//! ```

use std::iter::Peekable;

use crate::parameter::Parameter;
use crate::property::Property;
use crate::syntax::lexer::{Span, SpannedToken, Token, tokenize};

/// A scanned iCalendar content line, borrowing from the logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine<'src> {
    /// Property name (e.g., "DTSTART", "SUMMARY")
    pub name: &'src str,

    /// Property parameters (semicolon-separated), in encounter order
    pub parameters: Vec<ScannedParameter<'src>>,

    /// Raw property value, everything after the first unquoted colon
    pub value: &'src str,
}

impl ContentLine<'_> {
    /// Convert into an owned [`Property`].
    #[must_use]
    pub fn into_property(self) -> Property {
        Property {
            name: self.name.to_owned(),
            parameters: self
                .parameters
                .into_iter()
                .map(ScannedParameter::into_parameter)
                .collect(),
            value: self.value.to_owned(),
        }
    }
}

/// A scanned parameter from a content line.
///
/// Parameters have the format: `name=value` or `name=value1,value2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedParameter<'src> {
    /// Parameter name (e.g., "TZID", "VALUE")
    pub name: &'src str,

    /// Parameter values (comma-separated)
    pub values: Vec<ScannedParameterValue<'src>>,

    /// Span of the entire parameter
    pub span: Span,
}

impl ScannedParameter<'_> {
    /// Convert into an owned [`Parameter`].
    #[must_use]
    pub fn into_parameter(self) -> Parameter {
        Parameter {
            name: self.name.to_owned(),
            values: self.values.iter().map(|v| v.value.to_owned()).collect(),
        }
    }
}

/// A single scanned parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedParameterValue<'src> {
    /// The parameter value, without surrounding quotes
    pub value: &'src str,

    /// Whether the value was quoted in the source
    pub quoted: bool,

    /// Span of this value, including quotes
    pub span: Span,
}

/// Errors that can occur when scanning a content line.
///
/// Every variant carries the byte offset in the logical line where the
/// problem was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContentLineError {
    /// Missing colon separator, so no value was found.
    ///
    /// Example: `PROPNAME value` instead of `PROPNAME:value`
    #[error("no value found (missing colon) at offset {at}")]
    MissingColon {
        /// Offset where the colon was expected
        at: usize,
    },

    /// Empty property name.
    ///
    /// Example: `:value`
    #[error("empty property name")]
    EmptyName {
        /// Offset of the empty name
        at: usize,
    },

    /// Missing equals sign.
    ///
    /// Example: `DTSTART;TZID:20250101T090000`
    #[error("missing equals in parameter at offset {at}")]
    MissingEquals {
        /// Offset where the equals sign was expected
        at: usize,
    },

    /// Empty parameter name.
    ///
    /// Example: `SUMMARY;=value:text`
    #[error("empty parameter name at offset {at}")]
    EmptyParameterName {
        /// Offset of the empty name
        at: usize,
    },

    /// Missing parameter value.
    ///
    /// Example: `DTSTART;TZID=:20250101T090000`
    #[error("missing parameter value at offset {at}")]
    MissingValue {
        /// Offset of the empty value
        at: usize,
    },

    /// Unterminated quoted string.
    ///
    /// Example: `ATTENDEE;CN="unclosed:mailto:a@example.com`
    #[error("unterminated quoted string starting at offset {at}")]
    UnterminatedQuote {
        /// Offset of the region containing the opening quote
        at: usize,
    },
}

impl ContentLineError {
    /// Byte offset of the problem within the logical line.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match *self {
            Self::MissingColon { at }
            | Self::EmptyName { at }
            | Self::MissingEquals { at }
            | Self::EmptyParameterName { at }
            | Self::MissingValue { at }
            | Self::UnterminatedQuote { at } => at,
        }
    }
}

/// Scan one logical line into a [`ContentLine`].
///
/// # Errors
///
/// Returns a [`ContentLineError`] if the line does not follow the content
/// line grammar. The caller decides whether to skip the line or abort.
pub fn scan_content_line(line: &str) -> Result<ContentLine<'_>, ContentLineError> {
    let mut scanner = Scanner {
        line,
        tokens: tokenize(line).peekable(),
    };

    let name = scanner.scan_until(0, |t| matches!(t, Token::Colon | Token::Semicolon));
    let Some(SpannedToken(mut stop, mut stop_span)) = name.stop else {
        return Err(name.unterminated_or(ContentLineError::MissingColon { at: line.len() }));
    };
    if name.span.is_empty() {
        return Err(ContentLineError::EmptyName { at: name.span.start });
    }

    let mut parameters = Vec::new();
    while stop == Token::Semicolon {
        let (param, next) = scanner.scan_parameter(stop_span.end)?;
        parameters.push(param);
        SpannedToken(stop, stop_span) = next;
    }

    Ok(ContentLine {
        name: scanner.slice(name.span),
        parameters,
        value: line.get(stop_span.end..).unwrap_or_default(),
    })
}

struct Scanner<'src, I: Iterator<Item = SpannedToken<'src>>> {
    line: &'src str,
    tokens: Peekable<I>,
}

/// A region scanned by [`Scanner::scan_until`].
struct Region<'src> {
    span: Span,
    stop: Option<SpannedToken<'src>>,
    in_quotes: bool,
}

impl Region<'_> {
    fn unterminated_or(&self, err: ContentLineError) -> ContentLineError {
        if self.in_quotes {
            ContentLineError::UnterminatedQuote { at: self.span.start }
        } else {
            err
        }
    }
}

impl<'src, I: Iterator<Item = SpannedToken<'src>>> Scanner<'src, I> {
    /// Consume tokens until an unquoted stop token, which is consumed too.
    ///
    /// Reaching the end of the line returns a region without a stop token.
    fn scan_until(&mut self, start: usize, is_stop: impl Fn(Token<'src>) -> bool) -> Region<'src> {
        let mut in_quotes = false;
        let mut end = start;
        for spanned @ SpannedToken(token, span) in self.tokens.by_ref() {
            if !in_quotes && is_stop(token) {
                return Region {
                    span: Span::new(start, end),
                    stop: Some(spanned),
                    in_quotes,
                };
            }
            if token == Token::DQuote {
                in_quotes = !in_quotes;
            }
            end = span.end;
        }

        Region {
            span: Span::new(start, end),
            stop: None,
            in_quotes,
        }
    }

    /// Scan `param-name "=" param-value *("," param-value)` and the delimiter after it.
    fn scan_parameter(
        &mut self,
        start: usize,
    ) -> Result<(ScannedParameter<'src>, SpannedToken<'src>), ContentLineError> {
        let name = self.scan_until(start, |t| {
            matches!(t, Token::Equal | Token::Colon | Token::Semicolon)
        });
        let equal = match name.stop {
            Some(SpannedToken(Token::Equal, span)) => span,
            _ => return Err(name.unterminated_or(ContentLineError::MissingEquals { at: name.span.end })),
        };
        if name.span.is_empty() {
            return Err(ContentLineError::EmptyParameterName { at: start });
        }

        let mut values = Vec::new();
        let mut pos = equal.end;
        loop {
            let region = self.scan_until(pos, |t| {
                matches!(t, Token::Comma | Token::Semicolon | Token::Colon)
            });
            let Some(stop) = region.stop else {
                let at = self.line.len();
                return Err(region.unterminated_or(ContentLineError::MissingColon { at }));
            };
            values.push(self.parameter_value(region.span)?);

            match stop {
                SpannedToken(Token::Comma, span) => pos = span.end,
                _ => {
                    let span = Span::new(start, region.span.end);
                    let name = self.slice(name.span);
                    return Ok((ScannedParameter { name, values, span }, stop));
                }
            }
        }
    }

    fn parameter_value(&self, span: Span) -> Result<ScannedParameterValue<'src>, ContentLineError> {
        let raw = self.slice(span);
        if let Some(inner) = raw
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Ok(ScannedParameterValue {
                value: inner,
                quoted: true,
                span,
            })
        } else if raw.is_empty() {
            Err(ContentLineError::MissingValue { at: span.start })
        } else {
            Ok(ScannedParameterValue {
                value: raw,
                quoted: false,
                span,
            })
        }
    }

    fn slice(&self, span: Span) -> &'src str {
        self.line.get(span.into_range()).unwrap_or_default()
    }
}
