// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! cical - parse iCalendar streams and render them as JSON, Markdown or iCalendar

use std::process::ExitCode;

use cical_cli::run;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}
