// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for parsing whole iCalendar streams.

use std::io::{BufReader, Cursor};

use cical_ical::{
    FormatOptions, LineErrorKind, ParseError, ParseOptions, Parser, fold_line, format, parse,
    parse_date_time, parse_str,
};

const RFC_EXAMPLE: &str = concat!(
    "BEGIN:VCALENDAR\r\n",
    "PRODID:-//xyz Corp//NONSGML PDA Calendar Version 1.0//EN\r\n",
    "VERSION:2.0\r\n",
    "BEGIN:VEVENT\r\n",
    "DTSTAMP:19960704T120000Z\r\n",
    "UID:uid1@example.com\r\n",
    "ORGANIZER:mailto:jsmith@example.com\r\n",
    "DTSTART:19960918T143000Z\r\n",
    "DTEND:19960920T220000Z\r\n",
    "STATUS:CONFIRMED\r\n",
    "CATEGORIES:CONFERENCE\r\n",
    "SUMMARY:Networld+Interop Conference\r\n",
    "DESCRIPTION:Networld+Interop Conference\r\n",
    "  and Exhibit\\nAtlanta World Congress Center\\n\r\n",
    " Atlanta\\, Georgia\r\n",
    "END:VEVENT\r\n",
    "END:VCALENDAR\r\n",
);

#[test]
fn parses_balanced_stream() {
    let src = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nSUMMARY:test\nEND:VEVENT\nEND:VCALENDAR\n";
    let document = parse_str(src).unwrap();

    assert_eq!(document.components.len(), 1);
    let calendar = &document.components[0];
    assert_eq!(calendar.name, "VCALENDAR");
    assert_eq!(calendar.children.len(), 1);

    let event = &calendar.children[0];
    assert_eq!(event.name, "VEVENT");
    assert_eq!(event.properties.len(), 1);
    assert_eq!(event.properties[0].name, "SUMMARY");
    assert_eq!(event.properties[0].value, "test");
}

#[test]
fn parses_rfc_example_with_folding() {
    let document = parse_str(RFC_EXAMPLE).unwrap();
    assert!(!document.has_diagnostics());
    let event = &document.components[0].children[0];

    let description = event.property("DESCRIPTION").unwrap();
    assert_eq!(
        description.value,
        r"Networld+Interop Conference and Exhibit\nAtlanta World Congress Center\nAtlanta\, Georgia"
    );
    assert_eq!(
        description.unescaped_value(),
        "Networld+Interop Conference and Exhibit\nAtlanta World Congress Center\nAtlanta, Georgia"
    );

    let dtstart = parse_date_time(&event.property("DTSTART").unwrap().value).unwrap();
    assert!(dtstart.is_utc());
    assert_eq!(dtstart.date.year, 1996);
}

#[test]
fn unbalanced_end_is_fatal() {
    let err = parse_str("END:X\n").unwrap_err();
    assert!(matches!(err, ParseError::UnbalancedEnd { ref name, line: 1 } if name == "X"));
}

#[test]
fn unterminated_component_is_fatal() {
    let err = parse_str("BEGIN:VCALENDAR\nBEGIN:VEVENT\nSUMMARY:open\n").unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedComponent { ref name, line: 2 } if name == "VEVENT"));
}

#[test]
fn malformed_lines_are_skipped() {
    let src = "\
BEGIN:VCALENDAR
NO COLON HERE
X-BAD;PARAM:value
ATTENDEE;CN=\"unterminated:mailto:a@example.com
SUMMARY:kept
END:VCALENDAR
";
    let document = parse_str(src).unwrap();

    assert_eq!(document.components[0].properties.len(), 1);
    let lines: Vec<_> = document.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, [2, 3, 4]);
    assert!(
        document
            .diagnostics
            .iter()
            .all(|d| matches!(d.kind, LineErrorKind::Malformed { .. }))
    );
}

#[test]
fn strict_nesting_is_opt_in() {
    let src = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nEND:VTODO\nEND:VCALENDAR\n";
    assert!(parse_str(src).is_ok());

    let options = ParseOptions::default().strict_nesting(true);
    let err = parse(src.as_bytes(), options).unwrap_err();
    assert!(matches!(err, ParseError::MismatchedEnd { line: 3, .. }));
}

#[test]
fn parses_through_small_buffers() {
    // A tiny buffer forces folds and CRLF pairs to straddle refills.
    let reader = BufReader::with_capacity(3, Cursor::new(RFC_EXAMPLE.as_bytes()));
    let document = parse(reader, ParseOptions::default()).unwrap();
    assert!(!document.has_diagnostics());
    assert_eq!(document, parse_str(RFC_EXAMPLE).unwrap());
}

#[test]
fn streaming_parser_yields_each_calendar() {
    let src = RFC_EXAMPLE.repeat(3);
    let mut parser = Parser::new(src.as_bytes(), ParseOptions::default());
    let calendars: Vec<_> = parser.by_ref().map(Result::unwrap).collect();
    assert_eq!(calendars.len(), 3);
    assert!(parser.diagnostics().is_empty());
    assert!(calendars.iter().all(|c| c.children[0].property("DESCRIPTION").is_some()));
}

#[test]
fn format_then_parse_round_trips() {
    let document = parse_str(RFC_EXAMPLE).unwrap();
    assert!(!document.has_diagnostics());

    for width in [Some(8), Some(75), None] {
        let options = FormatOptions::default().folding(width);
        let ics = options.write_to_string(&document.components).unwrap();
        let reparsed = parse_str(&ics).unwrap();
        assert!(!reparsed.has_diagnostics(), "width {width:?}");
        assert_eq!(reparsed.components, document.components, "width {width:?}");
    }

    assert_eq!(
        format(&document.components).unwrap(),
        FormatOptions::default()
            .write_to_string(&document.components)
            .unwrap()
    );
}

#[test]
fn folded_content_line_keeps_quoted_parameters() {
    let line = r#"ATTENDEE;DELEGATED-FROM="mailto:a@example.com";CN="Doe, Jane":mailto:j@example.com"#;
    let src = format!("BEGIN:VEVENT\r\n{}\r\nEND:VEVENT\r\n", fold_line(line, 7));
    let document = parse_str(&src).unwrap();

    let attendee = &document.components[0].properties[0];
    assert_eq!(attendee.to_string(), line);
    assert_eq!(
        attendee.parameter("delegated-from").unwrap().value(),
        Some("mailto:a@example.com")
    );
    assert_eq!(attendee.parameter("CN").unwrap().values, ["Doe, Jane"]);
}
