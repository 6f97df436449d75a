// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Tree builder for constructing component hierarchy from content lines.
//!
//! This module provides a stack-based tree builder that converts flat logical
//! lines into a hierarchical component tree structure.
//!
//! # Architecture
//!
//! ```text
//! Logical Lines → Scanner → Tree Builder → Component Tree
//! ```
//!
//! # Algorithm
//!
//! The tree builder uses an explicit stack, so nesting depth never grows the
//! call stack:
//! 1. On BEGIN:X, push a new component onto the stack
//! 2. On property, add to the current component (top of stack)
//! 3. On END:X, pop from stack and add to parent component, or hand it out
//!    when the stack becomes empty

use crate::component::Component;
use crate::keyword::{KW_BEGIN, KW_END};
use crate::parser::{ParseError, ParseOptions};
use crate::syntax::reader::LogicalLine;
use crate::syntax::scanner::{ContentLine, scan_content_line};
use crate::syntax::{LineError, LineErrorKind};

/// Incremental, stack-based component tree builder.
///
/// Feed it logical lines with [`TreeBuilder::push_line`]; each finished
/// top-level component is returned as soon as its `END` line is read.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    options: ParseOptions,
    stack: Vec<Frame>,
    diagnostics: Vec<LineError>,
}

/// An open component together with the line of its `BEGIN`.
#[derive(Debug, Clone)]
struct Frame {
    component: Component,
    line: usize,
}

impl TreeBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Number of currently open components.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Recoverable problems recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[LineError] {
        &self.diagnostics
    }

    /// Record a skipped line.
    pub fn skip(&mut self, error: LineError) {
        tracing::warn!(line = error.line, "skipping line: {}", error.kind);
        self.diagnostics.push(error);
    }

    /// Process one logical line.
    ///
    /// Returns the completed top-level component when `line` closes it.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`ParseError`] for structural problems: an `END` with
    /// nothing open, nesting beyond [`ParseOptions::max_depth`], or (in strict
    /// mode) an `END` whose name differs from the open component.
    pub fn push_line(&mut self, line: &LogicalLine) -> Result<Option<Component>, ParseError> {
        if line.text.is_empty() {
            tracing::debug!(line = line.line, "skipping empty line");
            return Ok(None);
        }

        let content = match scan_content_line(&line.text) {
            Ok(content) => content,
            Err(error) => {
                self.skip(LineError {
                    line: line.line,
                    kind: LineErrorKind::Malformed {
                        error,
                        input: line.text.clone(),
                    },
                });
                return Ok(None);
            }
        };

        if content.name.eq_ignore_ascii_case(KW_BEGIN) {
            self.begin(&content, line.line)?;
            Ok(None)
        } else if content.name.eq_ignore_ascii_case(KW_END) {
            self.end(&content, line.line)
        } else {
            self.property(content, line.line);
            Ok(None)
        }
    }

    /// Check that every component has been closed.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnterminatedComponent`] naming the innermost open
    /// component.
    pub fn ensure_closed(&self) -> Result<(), ParseError> {
        match self.stack.last() {
            Some(frame) => Err(ParseError::UnterminatedComponent {
                name: frame.component.name.clone(),
                line: frame.line,
            }),
            None => Ok(()),
        }
    }

    /// End of input: return the collected diagnostics.
    ///
    /// # Errors
    ///
    /// Same as [`TreeBuilder::ensure_closed`].
    pub fn finish(self) -> Result<Vec<LineError>, ParseError> {
        self.ensure_closed()?;
        Ok(self.diagnostics)
    }

    fn begin(&mut self, content: &ContentLine<'_>, line: usize) -> Result<(), ParseError> {
        warn_parameters(content, line);

        if let Some(limit) = self.options.max_depth
            && self.stack.len() >= limit
        {
            return Err(ParseError::NestingTooDeep { limit, line });
        }

        tracing::trace!(line, name = content.value, "begin component");
        self.stack.push(Frame {
            component: Component::new(content.value),
            line,
        });
        Ok(())
    }

    fn end(
        &mut self,
        content: &ContentLine<'_>,
        line: usize,
    ) -> Result<Option<Component>, ParseError> {
        warn_parameters(content, line);

        let Some(frame) = self.stack.pop() else {
            return Err(ParseError::UnbalancedEnd {
                name: content.value.to_owned(),
                line,
            });
        };

        let component = frame.component;
        if !component.is(content.value) {
            if self.options.strict_nesting {
                return Err(ParseError::MismatchedEnd {
                    expected: component.name,
                    found: content.value.to_owned(),
                    line,
                });
            }
            tracing::debug!(
                line,
                expected = component.name.as_str(),
                found = content.value,
                "END name does not match BEGIN, accepting"
            );
        }

        match self.stack.last_mut() {
            Some(parent) => {
                parent.component.children.push(component);
                Ok(None)
            }
            None => Ok(Some(component)),
        }
    }

    fn property(&mut self, content: ContentLine<'_>, line: usize) {
        match self.stack.last_mut() {
            Some(frame) => frame.component.properties.push(content.into_property()),
            None => self.skip(LineError {
                line,
                kind: LineErrorKind::PropertyOutsideComponent {
                    name: content.name.to_owned(),
                },
            }),
        }
    }
}

/// BEGIN and END lines should not have parameters; they are accepted anyway.
fn warn_parameters(content: &ContentLine<'_>, line: usize) {
    if !content.parameters.is_empty() {
        tracing::warn!(
            line,
            name = content.name,
            "{} line with parameters (not allowed per RFC 5545)",
            content.name
        );
    }
}
