// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for `cical-ical`.

mod cli;
mod config;
mod render;

pub use crate::{
    cli::{APP_NAME, Cli, run},
    config::{Config, OutputConfig, ParserConfig, parse_config},
    render::{OutputFormat, RenderOptions, render_json, render_markdown},
};
