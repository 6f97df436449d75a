// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Keywords defined in iCalendar RFC 5545.

pub const KW_BEGIN: &str = "BEGIN";
pub const KW_END: &str = "END";

// Section 3.2 - Property Parameters
pub const KW_TZID: &str = "TZID";

// Section 3.8 - Date-valued properties
pub const KW_DTSTART: &str = "DTSTART";
pub const KW_DTEND: &str = "DTEND";
pub const KW_DUE: &str = "DUE";
pub const KW_TRIGGER: &str = "TRIGGER";
pub const KW_DTSTAMP: &str = "DTSTAMP";

/// Properties whose value is rendered as a point in time when it parses.
pub const DATE_VALUED_PROPERTIES: [&str; 5] = [KW_DTSTART, KW_DTEND, KW_DUE, KW_TRIGGER, KW_DTSTAMP];

/// Check whether a property name is one of [`DATE_VALUED_PROPERTIES`], ignoring ASCII case.
#[must_use]
pub fn is_date_valued(name: &str) -> bool {
    DATE_VALUED_PROPERTIES
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(name))
}
