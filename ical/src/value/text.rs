// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Text value escapes as defined in RFC 5545 Section 3.3.11.

use std::borrow::Cow;

/// Decode the escapes of a TEXT value.
///
/// ```txt
/// ESCAPED-CHAR = ("\\" / "\;" / "\," / "\N" / "\n")
/// ; \\ encodes \, \N or \n encodes newline
/// ; \; encodes ;, \, encodes ,
/// ```
///
/// Unknown escapes and a trailing lone backslash are kept as written. Borrows
/// the input when there is nothing to decode.
///
/// ```
/// # use cical_ical::unescape_text;
/// assert_eq!(unescape_text(r"a\, b\nc"), "a, b\nc");
/// assert_eq!(unescape_text(r"C:\temp"), r"C:\temp");
/// ```
#[must_use]
pub fn unescape_text(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some(next) => match TextEscape::from_char(next) {
                Some(escape) => out.push_str(escape.as_ref()),
                None => {
                    out.push('\\');
                    out.push(next);
                }
            },
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEscape {
    Backslash,
    Semicolon,
    Comma,
    Newline,
}

impl TextEscape {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            '\\' => Some(Self::Backslash),
            ';' => Some(Self::Semicolon),
            ',' => Some(Self::Comma),
            'N' | 'n' => Some(Self::Newline),
            _ => None,
        }
    }
}

impl AsRef<str> for TextEscape {
    fn as_ref(&self) -> &str {
        match self {
            Self::Backslash => "\\",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Newline => "\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_rfc_examples() {
        assert_eq!(
            unescape_text(r"Project XYZ Final Review\nConference Room - 3B\nCome Prepared."),
            "Project XYZ Final Review\nConference Room - 3B\nCome Prepared."
        );
        assert_eq!(unescape_text(r"a\;b\,c\\d\Ne"), "a;b,c\\d\ne");
    }

    #[test]
    fn borrows_when_nothing_to_decode() {
        assert!(matches!(unescape_text("plain text"), Cow::Borrowed(_)));
        assert!(matches!(unescape_text(r"a\,b"), Cow::Owned(_)));
    }

    #[test]
    fn keeps_unknown_escapes() {
        assert_eq!(unescape_text(r"C:\temp"), r"C:\temp");
        assert_eq!(unescape_text(r"trailing\"), r"trailing\");
        assert_eq!(unescape_text(r"\\\x"), r"\\x");
    }
}
