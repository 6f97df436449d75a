// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Properties attached to a component.

use std::borrow::Cow;
use std::fmt::{self, Display};

use crate::parameter::Parameter;
use crate::value::unescape_text;

/// A parsed iCalendar property (name, optional parameters, and value).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Property {
    /// Property name (case-insensitive, original casing preserved)
    pub name: String,
    /// Property parameters in encounter order (allow duplicates & multi-values)
    pub parameters: Vec<Parameter>,
    /// Raw property value, backslash escapes preserved as authored
    pub value: String,
}

impl Property {
    /// Create a property without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            value: value.into(),
        }
    }

    /// Append a parameter, builder style.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Check the property name, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Find the first parameter with the given name, ignoring ASCII case.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.is(name))
    }

    /// The value with RFC 5545 TEXT escapes (`\n`, `\,`, `\;`, `\\`) decoded.
    ///
    /// The stored [`Property::value`] is never modified.
    #[must_use]
    pub fn unescaped_value(&self) -> Cow<'_, str> {
        unescape_text(&self.value)
    }
}

/// Writes the unfolded content line, e.g. `DTSTART;TZID=Europe/Paris:20250101T090000`.
impl Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for param in &self.parameters {
            write!(f, ";{param}")?;
        }
        write!(f, ":{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_parameter_lookup_ignores_case() {
        let prop = Property::new("DTSTART", "20250101T090000")
            .with_parameter(Parameter::new("TZID", ["Europe/Paris"]));

        assert!(prop.is("dtstart"));
        let tzid = prop.parameter("tzid").unwrap();
        assert_eq!(tzid.value(), Some("Europe/Paris"));
        assert!(prop.parameter("VALUE").is_none());
    }

    #[test]
    fn property_display_content_line() {
        let prop = Property::new("ATTENDEE", "mailto:b@example.com")
            .with_parameter(Parameter::new("ROLE", ["CHAIR"]))
            .with_parameter(Parameter::new("MEMBER", ["mailto:g@example.com"]));
        assert_eq!(
            prop.to_string(),
            "ATTENDEE;ROLE=CHAIR;MEMBER=\"mailto:g@example.com\":mailto:b@example.com"
        );
    }

    #[test]
    fn property_value_is_raw_until_unescaped() {
        let prop = Property::new("SUMMARY", r"Lunch\, then a walk\nOutside");
        assert_eq!(prop.value, r"Lunch\, then a walk\nOutside");
        assert_eq!(prop.unescaped_value(), "Lunch, then a walk\nOutside");
    }
}
