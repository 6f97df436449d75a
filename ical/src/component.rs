// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Components and the document that owns them.

use crate::property::Property;
use crate::syntax::LineError;

/// A parsed iCalendar component (e.g., VCALENDAR, VEVENT, VTODO)
///
/// A component exclusively owns its properties and children; dropping it drops
/// the whole subtree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    /// Component name as written after `BEGIN:` (e.g., "VCALENDAR", "VEVENT")
    pub name: String,
    /// Properties in original order
    pub properties: Vec<Property>,
    /// Nested child components
    pub children: Vec<Component>,
}

impl Component {
    /// Create an empty component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append a property, builder style.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Append a child component, builder style.
    #[must_use]
    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    /// Check the component name, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Find the first property with the given name, ignoring ASCII case.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.is(name))
    }

    /// All properties with the given name, ignoring ASCII case.
    pub fn properties_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> {
        self.properties.iter().filter(move |p| p.is(name))
    }

    /// Child components with the given name, ignoring ASCII case.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Component> {
        self.children.iter().filter(move |c| c.is(name))
    }

    /// Depth-first, pre-order iteration over this component and its descendants.
    ///
    /// Each item carries its depth relative to `self` (which is depth 0).
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Iterator returned by [`Component::walk`].
///
/// Uses an explicit stack, so deeply nested trees do not grow the call stack.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Component)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Component);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, component) = self.stack.pop()?;
        // reversed so the first child is visited first
        self.stack
            .extend(component.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, component))
    }
}

/// The synthetic top-level container produced by a parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Fully parsed top-level objects, typically one VCALENDAR each
    pub components: Vec<Component>,
    /// Recoverable problems; the offending lines were skipped
    pub diagnostics: Vec<LineError>,
}

impl Document {
    /// Whether any line was skipped during the parse.
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
