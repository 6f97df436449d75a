// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) formatter module.
//!
//! This module provides functionality to format component trees back to the
//! RFC 5545 text format, writing to any `std::io::Write` implementer.
//!
//! # Example
//!
//! ```
//! use cical_ical::{Component, Property, format};
//!
//! let calendar = Component::new("VCALENDAR").with_property(Property::new("VERSION", "2.0"));
//! let ics = format(&[calendar]).unwrap();
//! assert_eq!(ics, "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n");
//! ```

use std::io::{self, Write};

use crate::component::Component;
use crate::keyword::{KW_BEGIN, KW_END};
use crate::property::Property;

/// Convenience function to format components to a `String` (uses default options).
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails or if the output
/// contains invalid UTF-8 data.
pub fn format(components: &[Component]) -> io::Result<String> {
    FormatOptions::default().write_to_string(components)
}

/// Fold one logical line at `width` octets, without a trailing line break.
///
/// Continuation lines start with a single SPACE. Each physical line carries at
/// least one character and characters are never split, so a line wider than
/// `width` characters is folded as tightly as possible.
///
/// ```
/// # use cical_ical::fold_line;
/// assert_eq!(fold_line("SUMMARY:abc", 9), "SUMMARY:a\r\n bc");
/// ```
#[must_use]
pub fn fold_line(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len() + 3 * (line.len() / width.max(1)));
    let mut state = FoldState::default();
    for c in line.chars() {
        if state.advance(Some(width), c.len_utf8()) {
            out.push_str("\r\n ");
        }
        out.push(c);
    }
    out
}

/// Formatting options for the iCalendar formatter.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets
    ///
    /// Default: `Some(75)` for RFC 5545 compliance.
    pub folding: Option<usize>,

    /// Line folding style.
    ///
    /// Default: `FoldingStyle::Space` (CRLF + SPACE).
    pub folding_style: FoldingStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            folding: Some(75),
            folding_style: FoldingStyle::default(),
        }
    }
}

impl FormatOptions {
    /// Set the line folding option.
    #[must_use]
    pub fn folding(mut self, folding: Option<usize>) -> Self {
        self.folding = folding;
        self
    }

    /// Set the line folding style.
    #[must_use]
    pub const fn folding_style(mut self, style: FoldingStyle) -> Self {
        self.folding_style = style;
        self
    }

    /// Convenience method to write components to any `Write` implementer.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write(&self, components: &[Component], w: &mut impl Write) -> io::Result<()> {
        let mut formatter = Formatter::new(w, *self);
        for component in components {
            formatter.write_component(component)?;
        }
        formatter.flush()
    }

    /// Convenience method to write components to a `String`.
    ///
    /// # Errors
    /// Returns an error if writing fails or if the output contains invalid UTF-8 data.
    pub fn write_to_string(&self, components: &[Component]) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write(components, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Line folding style for RFC 5545 formatting.
///
/// RFC 5545 specifies that folded lines should start with CRLF followed by
/// a whitespace character (SPACE or TAB).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldingStyle {
    /// CRLF + SPACE (RFC 5545 default)
    #[default]
    Space,
    /// CRLF + TAB
    Tab,
}

impl FoldingStyle {
    /// Get the folding sequence for this style.
    #[must_use]
    pub(crate) const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Space => b"\r\n ",
            Self::Tab => b"\r\n\t",
        }
    }
}

/// Position within the current physical line.
#[derive(Debug, Clone, Copy, Default)]
struct FoldState {
    /// Octets on the physical line, including a leading fold marker
    length: usize,
    /// Octets of content on the physical line
    content: usize,
}

impl FoldState {
    /// Account for a character of `len` octets; `true` if a fold must precede it.
    fn advance(&mut self, width: Option<usize>, len: usize) -> bool {
        let fold = match width {
            Some(width) => self.content > 0 && self.length + len > width,
            None => false,
        };
        if fold {
            self.length = 1; // SPACE or TAB
            self.content = 0;
        }
        self.length += len;
        self.content += len;
        fold
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// iCalendar formatter that writes to any `Write` implementer.
///
/// Bytes written through its [`Write`] implementation are folded on the fly.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use cical_ical::{FormatOptions, Formatter};
///
/// let mut buffer = Vec::new();
/// let mut formatter = Formatter::new(&mut buffer, FormatOptions::default().folding(Some(10)));
/// formatter.write_line("DESCRIPTION:folded")?;
/// assert_eq!(buffer, b"DESCRIPTIO\r\n N:folded\r\n");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct Formatter<W: Write> {
    /// The underlying writer.
    writer: W,
    /// Formatting options.
    options: FormatOptions,
    /// Fold bookkeeping for the current line.
    state: FoldState,
}

impl<W: Write> Formatter<W> {
    /// Create a new formatter with options.
    #[must_use]
    pub fn new(writer: W, options: FormatOptions) -> Self {
        Self {
            writer,
            options,
            state: FoldState::default(),
        }
    }

    /// Get a mutable reference to the underlying writer.
    #[must_use]
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Get a reference to the underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consumes this formatter, returning the underlying writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write a component with its properties and descendants.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_component(&mut self, component: &Component) -> io::Result<()> {
        enum Step<'a> {
            Open(&'a Component),
            Close(&'a str),
        }

        let mut steps = vec![Step::Open(component)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(component) => {
                    self.write_block_line(KW_BEGIN, &component.name)?;
                    for property in &component.properties {
                        self.write_property(property)?;
                    }
                    steps.push(Step::Close(&component.name));
                    steps.extend(component.children.iter().rev().map(Step::Open));
                }
                Step::Close(name) => self.write_block_line(KW_END, name)?,
            }
        }
        Ok(())
    }

    /// Write a single property as a content line.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_property(&mut self, property: &Property) -> io::Result<()> {
        write!(self, "{property}")?;
        self.writeln()
    }

    /// Write one logical line followed by CRLF.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write_all(line.as_bytes())?;
        self.writeln()
    }

    fn write_block_line(&mut self, keyword: &str, name: &str) -> io::Result<()> {
        write!(self, "{keyword}:{name}")?;
        self.writeln()
    }

    /// Write a CRLF line ending.
    fn writeln(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\r\n")?;
        self.state.reset();
        Ok(())
    }
}

impl<W: Write> Write for Formatter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, &byte) in buf.iter().enumerate() {
            // folds go before lead bytes only, so chunks may split a character
            let len = match byte {
                b'\n' => {
                    self.state.reset();
                    continue;
                }
                0x80..=0xBF => {
                    self.state.length += 1;
                    self.state.content += 1;
                    continue;
                }
                0x00..=0x7F => 1,
                0xC0..=0xDF => 2,
                0xE0..=0xEF => 3,
                _ => 4,
            };

            if self.state.advance(self.options.folding, len) {
                self.writer.write_all(buf.get(start..i).unwrap_or_default())?;
                self.writer.write_all(self.options.folding_style.as_bytes())?;
                start = i;
            }
            // `advance` already counted the whole character
            self.state.length -= len - 1;
            self.state.content -= len - 1;
        }
        self.writer.write_all(buf.get(start..).unwrap_or_default())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
