// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property parameters as defined in RFC 5545 Section 3.2.

use std::fmt::{self, Display};

/// A property parameter (e.g., `TZID=America/New_York`).
///
/// RFC 5545 permits comma-separated multi-valued parameters, so every
/// parameter owns an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    /// Parameter name (e.g., "TZID", "VALUE", "CN", "ROLE", "PARTSTAT")
    pub name: String,
    /// Parameter values split by commas, surrounding quotes removed
    pub values: Vec<String>,
}

impl Parameter {
    /// Create a parameter from a name and its values.
    #[must_use]
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The first value, which is the only one for most parameters.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Check the parameter name, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.name)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if needs_quotes(value) {
                write!(f, "\"{value}\"")?;
            } else {
                f.write_str(value)?;
            }
        }
        Ok(())
    }
}

/// A parameter value must be written as a quoted-string when it is empty or
/// contains one of the content-line delimiters.
fn needs_quotes(value: &str) -> bool {
    value.is_empty() || value.contains([':', ';', ','])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_first_value() {
        let param = Parameter::new("MEMBER", ["a", "b"]);
        assert_eq!(param.value(), Some("a"));
        assert!(param.is("member"));

        let empty = Parameter::new("X-EMPTY", Vec::<String>::new());
        assert_eq!(empty.value(), None);
    }

    #[test]
    fn parameter_display_quotes_delimiters() {
        let param = Parameter::new("DELEGATED-TO", ["mailto:a@example.com", "plain"]);
        assert_eq!(
            param.to_string(),
            "DELEGATED-TO=\"mailto:a@example.com\",plain"
        );

        let param = Parameter::new("CN", [""]);
        assert_eq!(param.to_string(), "CN=\"\"");
    }
}
