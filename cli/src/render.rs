// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Renderers turning a parsed component tree into output text.

mod json;
mod markdown;

use std::{borrow::Cow, error::Error};

use cical_ical::{Component, Property, format};

pub use self::json::render_json;
pub use self::markdown::render_markdown;

/// The output format for the rendered tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,

    /// Nested headings and bullet lists
    #[default]
    Markdown,

    /// iCalendar text, folded at 75 octets
    Ics,
}

impl OutputFormat {
    /// Render the components in this format.
    pub fn render(
        self,
        components: &[Component],
        options: RenderOptions,
    ) -> Result<String, Box<dyn Error>> {
        Ok(match self {
            OutputFormat::Json => render_json(components, options)?,
            OutputFormat::Markdown => render_markdown(components, options),
            OutputFormat::Ics => format(components)?,
        })
    }
}

/// Options shared by the JSON and Markdown renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Decode TEXT escapes in property values
    pub unescape_text: bool,
}

impl RenderOptions {
    fn value<'a>(&self, property: &'a Property) -> Cow<'a, str> {
        if self.unescape_text {
            property.unescaped_value()
        } else {
            Cow::Borrowed(&property.value)
        }
    }
}
