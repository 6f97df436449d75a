// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write;

use cical_ical::keyword::{KW_TZID, is_date_valued};
use cical_ical::{Component, Property, parse_date, parse_date_time};

use crate::render::RenderOptions;

const MAX_HEADING_LEVEL: usize = 6;

const DATE_TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";
const DATE_FORMAT: &str = "%a, %d %b %Y";

/// Render components as nested Markdown headings with property bullet lists.
pub fn render_markdown(components: &[Component], options: RenderOptions) -> String {
    let mut out = String::new();
    for (depth, component) in components.iter().flat_map(Component::walk) {
        let level = (depth + 1).min(MAX_HEADING_LEVEL);
        if !out.is_empty() {
            out.push('\n');
        }
        // Writing into a `String` cannot fail.
        let _ = writeln!(out, "{} {}", "#".repeat(level), component.name);

        if !component.properties.is_empty() {
            out.push('\n');
        }
        for property in &component.properties {
            write_property(&mut out, property, options);
        }
    }
    out
}

fn write_property(out: &mut String, property: &Property, options: RenderOptions) {
    let value = display_value(property, options);
    let _ = if value.is_empty() {
        writeln!(out, "- *{}*", property.name)
    } else {
        writeln!(out, "- *{}*: {}", property.name, value)
    };

    for parameter in &property.parameters {
        let _ = writeln!(out, "  - *{}*", parameter.name);
        for value in &parameter.values {
            let _ = writeln!(out, "    - {value}");
        }
    }
}

fn display_value(property: &Property, options: RenderOptions) -> String {
    let value = options.value(property);

    if is_date_valued(&property.name)
        && let Some(timestamp) = human_timestamp(property)
    {
        return timestamp;
    }

    if let Some(address) = strip_prefix_ignore_case(&value, "mailto:") {
        return format!("<{address}>");
    }

    if has_prefix_ignore_case(&value, "http://") || has_prefix_ignore_case(&value, "https://") {
        return format!("[{value}]({value})");
    }

    value.into_owned()
}

/// Format a DATE-TIME or DATE value, `None` when it parses as neither.
fn human_timestamp(property: &Property) -> Option<String> {
    if let Ok(dt) = parse_date_time(&property.value) {
        let formatted = dt.civil_date_time().strftime(DATE_TIME_FORMAT).to_string();
        return Some(if dt.is_utc() {
            format!("{formatted} UTC")
        } else if let Some(tzid) = property.parameter(KW_TZID).and_then(|p| p.value()) {
            format!("{formatted} ({tzid})")
        } else {
            formatted
        });
    }

    let date = parse_date(&property.value).ok()?.civil_date()?;
    Some(date.strftime(DATE_FORMAT).to_string())
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if has_prefix_ignore_case(value, prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use cical_ical::{Parameter, parse_str};

    use super::*;

    fn render(src: &str) -> String {
        let document = parse_str(src).unwrap();
        render_markdown(&document.components, RenderOptions::default())
    }

    #[test]
    fn test_render_tree() {
        let src = "\
BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
SUMMARY:Meeting
ATTENDEE;CN=\"Doe, Jane\",Other:mailto:j@example.com
URL:https://example.com/event
X-EMPTY:
END:VEVENT
END:VCALENDAR
";
        let expected = "\
# VCALENDAR

- *VERSION*: 2.0

## VEVENT

- *SUMMARY*: Meeting
- *ATTENDEE*: <j@example.com>
  - *CN*
    - Doe, Jane
    - Other
- *URL*: [https://example.com/event](https://example.com/event)
- *X-EMPTY*
";
        assert_eq!(render(src), expected);
    }

    #[test]
    fn test_heading_depth_is_capped() {
        let src = (1..=8)
            .map(|i| format!("BEGIN:C{i}\n"))
            .chain((1..=8).rev().map(|i| format!("END:C{i}\n")))
            .collect::<String>();
        let out = render(&src);

        assert!(out.contains("\n##### C5\n"));
        assert!(out.contains("\n###### C6\n"));
        assert!(out.contains("\n###### C8\n"));
        assert!(!out.contains("#######"));
    }

    #[test]
    fn test_render_date_values() {
        let utc = Property::new("DTSTART", "19970610T172345Z");
        assert_eq!(
            display_value(&utc, RenderOptions::default()),
            "Tue, 10 Jun 1997 17:23:45 UTC"
        );

        let local = Property::new("DTEND", "19970610T172345")
            .with_parameter(Parameter::new("TZID", ["America/New_York"]));
        assert_eq!(
            display_value(&local, RenderOptions::default()),
            "Tue, 10 Jun 1997 17:23:45 (America/New_York)"
        );

        let floating = Property::new("dtstamp", "19970610T172345");
        assert_eq!(
            display_value(&floating, RenderOptions::default()),
            "Tue, 10 Jun 1997 17:23:45"
        );

        let date = Property::new("DUE", "19970610");
        assert_eq!(
            display_value(&date, RenderOptions::default()),
            "Tue, 10 Jun 1997"
        );
    }

    #[test]
    fn test_render_date_fallback() {
        let trigger = Property::new("TRIGGER", "-PT15M");
        assert_eq!(display_value(&trigger, RenderOptions::default()), "-PT15M");

        let invalid = Property::new("DTSTART", "19970230T000000Z");
        assert_eq!(
            display_value(&invalid, RenderOptions::default()),
            "19970230T000000Z"
        );

        // Only date-valued properties are reformatted.
        let summary = Property::new("SUMMARY", "19970610T172345Z");
        assert_eq!(
            display_value(&summary, RenderOptions::default()),
            "19970610T172345Z"
        );
    }

    #[test]
    fn test_render_links_ignore_case() {
        let organizer = Property::new("ORGANIZER", "MAILTO:jsmith@example.com");
        assert_eq!(
            display_value(&organizer, RenderOptions::default()),
            "<jsmith@example.com>"
        );

        let url = Property::new("URL", "HTTP://example.com");
        assert_eq!(
            display_value(&url, RenderOptions::default()),
            "[HTTP://example.com](HTTP://example.com)"
        );

        let plain = Property::new("LOCATION", "mail");
        assert_eq!(display_value(&plain, RenderOptions::default()), "mail");
    }

    #[test]
    fn test_render_unescaped_text() {
        let property = Property::new("SUMMARY", r"a\, b");
        let options = RenderOptions {
            unescape_text: true,
        };
        assert_eq!(display_value(&property, options), "a, b");
        assert_eq!(display_value(&property, RenderOptions::default()), r"a\, b");
    }
}
