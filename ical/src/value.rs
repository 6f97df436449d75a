// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Value type parsing module for iCalendar property values.
//!
//! Property values are kept raw in the tree. This module interprets them on
//! demand as the value types defined in RFC 5545 Section 3.3.

mod datetime;
mod text;

pub use datetime::{DateTimeError, ValueDate, ValueDateTime, ValueTime, parse_date, parse_date_time};
pub use text::unescape_text;
