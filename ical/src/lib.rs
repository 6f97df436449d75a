// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse iCalendar (RFC 5545) streams into a tree of components, properties
//! and parameters, and write that tree back out.
//!
//! ```
//! # use cical_ical::parse_str;
//! let src = "\
//! BEGIN:VCALENDAR\r\n\
//! BEGIN:VEVENT\r\n\
//! SUMMARY:test\r\n\
//! END:VEVENT\r\n\
//! END:VCALENDAR\r\n\
//! ";
//! let document = parse_str(src).unwrap();
//! let calendar = &document.components[0];
//! assert_eq!(calendar.name, "VCALENDAR");
//! assert_eq!(calendar.children[0].properties[0].value, "test");
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::similar_names, clippy::single_match_else, clippy::match_bool)]

mod component;
pub mod formatter;
pub mod keyword;
mod parameter;
mod parser;
mod property;
pub mod syntax;
pub mod value;

pub use crate::component::{Component, Document, Walk};
pub use crate::formatter::{FoldingStyle, FormatOptions, Formatter, fold_line, format};
pub use crate::parameter::Parameter;
pub use crate::parser::{ParseError, ParseOptions, Parser, parse, parse_str};
pub use crate::property::Property;
pub use crate::syntax::{
    ContentLineError, LineError, LineErrorKind, LineReader, LogicalLine, ReadError,
};
pub use crate::value::{
    DateTimeError, ValueDate, ValueDateTime, ValueTime, parse_date, parse_date_time,
    unescape_text,
};
