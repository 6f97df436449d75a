// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

use cical_ical::{Component, Parameter, Property};
use serde::Serialize;

use crate::render::RenderOptions;

/// Render components as a pretty-printed JSON array.
///
/// Each component is `{ "name", "prop", "components" }`, each property is
/// `{ "name", "params", "value" }` with `params` omitted when empty.
pub fn render_json(
    components: &[Component],
    options: RenderOptions,
) -> serde_json::Result<String> {
    let views: Vec<_> = components
        .iter()
        .map(|c| ComponentView::new(c, options))
        .collect();
    serde_json::to_string_pretty(&views)
}

#[derive(Debug, Serialize)]
struct ComponentView<'a> {
    name: &'a str,
    prop: Vec<PropertyView<'a>>,
    components: Vec<ComponentView<'a>>,
}

impl<'a> ComponentView<'a> {
    fn new(component: &'a Component, options: RenderOptions) -> Self {
        Self {
            name: &component.name,
            prop: component
                .properties
                .iter()
                .map(|p| PropertyView::new(p, options))
                .collect(),
            components: component
                .children
                .iter()
                .map(|c| ComponentView::new(c, options))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PropertyView<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    params: Vec<ParameterView<'a>>,
    value: Cow<'a, str>,
}

impl<'a> PropertyView<'a> {
    fn new(property: &'a Property, options: RenderOptions) -> Self {
        Self {
            name: &property.name,
            params: property.parameters.iter().map(ParameterView::from).collect(),
            value: options.value(property),
        }
    }
}

#[derive(Debug, Serialize)]
struct ParameterView<'a> {
    name: &'a str,
    values: &'a [String],
}

impl<'a> From<&'a Parameter> for ParameterView<'a> {
    fn from(parameter: &'a Parameter) -> Self {
        Self {
            name: &parameter.name,
            values: &parameter.values,
        }
    }
}
