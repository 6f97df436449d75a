// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    error::Error,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use cical_ical::{Document, parse};
use clap::{
    ArgAction, ArgGroup, ArgMatches, Command, ValueHint, arg, builder::styling, crate_version,
    value_parser,
};
use colored::Colorize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

use crate::config::parse_config;
use crate::render::{OutputFormat, RenderOptions};

/// Name of the application, also used for the configuration directory.
pub const APP_NAME: &str = "cical";

const CICAL_LOG_ENV: &str = "CICAL_LOG";

/// Run the cical command-line interface.
pub async fn run() -> ExitCode {
    let cli = match Cli::parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version are printed to stdout and are not failures.
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            if let Err(err) = e.print() {
                eprintln!("{} {}", "Error:".red(), err);
            }
            return code;
        }
    };

    init_tracing(cli.verbose);
    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(CICAL_LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // Fails only when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Command-line interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    /// Input file, `None` reads standard input
    pub file: Option<PathBuf>,

    /// Output file, `None` writes standard output
    pub output: Option<PathBuf>,

    /// Output format, `None` defers to the configuration
    pub format: Option<OutputFormat>,

    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Reject `END` lines naming a component other than the open one
    pub strict: bool,

    /// Enable debug logging
    pub verbose: bool,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Parse iCalendar streams and render them as JSON, Markdown or iCalendar.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .disable_version_flag(true)
            .arg(
                arg!(-f --file <FILE> "Input file, `-` or omitted for standard input")
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(-o --output <FILE> "Output file, omitted for standard output")
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(-j --json "Render as JSON"))
            .arg(arg!(-m --markdown "Render as Markdown"))
            .arg(arg!(-i --ics "Render as iCalendar"))
            .group(
                ArgGroup::new("format")
                    .args(["json", "markdown", "ics"])
                    .multiple(false),
            )
            .arg(
                arg!(-c --config <CONFIG> "Path to the configuration file")
                    .required(false)
                    .long_help(
                        "\
Path to the configuration file. Defaults to $CICAL_CONFIG, then $XDG_CONFIG_HOME/cical/config.toml \
on Linux and MacOS, %LOCALAPPDATA%/cical/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(--strict "Reject END lines that do not close the open component"))
            .arg(arg!(--verbose "Show debug logs on standard error"))
            .arg(arg!(-v --version "Print version").action(ArgAction::Version))
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, clap::Error> {
        let matches = Self::command().try_get_matches()?;
        Ok(Self::from(&matches))
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        Ok(Self::from(&matches))
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Self {
        let format = if matches.get_flag("json") {
            Some(OutputFormat::Json)
        } else if matches.get_flag("markdown") {
            Some(OutputFormat::Markdown)
        } else if matches.get_flag("ics") {
            Some(OutputFormat::Ics)
        } else {
            None
        };

        Self {
            file: matches.get_one("file").cloned(),
            output: matches.get_one("output").cloned(),
            format,
            config: matches.get_one("config").cloned(),
            strict: matches.get_flag("strict"),
            verbose: matches.get_flag("verbose"),
        }
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "parsing configuration...");
        let config = parse_config(self.config.clone()).await?;

        let mut options = config.parser.options();
        if self.strict {
            options = options.strict_nesting(true);
        }
        let format = self.format.unwrap_or(config.output.format);
        let render_options = RenderOptions {
            unescape_text: config.output.unescape_text,
        };

        let input = read_input(self.file.as_deref()).await?;
        tracing::debug!(bytes = input.len(), ?options, "parsing input...");
        let document = parse(input.as_slice(), options)?;
        report_diagnostics(&document);

        tracing::debug!(?format, "rendering output...");
        let mut rendered = format.render(&document.components, render_options)?;
        if !rendered.is_empty() && !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        write_output(self.output.as_deref(), rendered.as_bytes()).await
    }
}

async fn read_input(file: Option<&Path>) -> Result<Vec<u8>, Box<dyn Error>> {
    match file {
        Some(path) if path != Path::new("-") => tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to open {}: {}", path.display(), e).into()),
        _ => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(buf)
        }
    }
}

async fn write_output(output: Option<&Path>, content: &[u8]) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => tokio::fs::write(path, content)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e).into()),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

fn report_diagnostics(document: &Document) {
    if document.has_diagnostics() {
        eprintln!(
            "{} skipped {} malformed line(s), rerun with --verbose for details",
            "Warning:".yellow(),
            document.diagnostics.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["test"]).unwrap();
        assert_eq!(
            cli,
            Cli {
                file: None,
                output: None,
                format: None,
                config: None,
                strict: false,
                verbose: false,
            }
        );
    }

    #[test]
    fn test_parse_files() {
        let args = ["test", "-f", "in.ics", "--output", "out.md", "-c", "/tmp/config.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("in.ics")));
        assert_eq!(cli.output, Some(PathBuf::from("out.md")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
    }

    #[test]
    fn test_parse_output_format() {
        for (flag, format) in [
            ("-j", OutputFormat::Json),
            ("--json", OutputFormat::Json),
            ("-m", OutputFormat::Markdown),
            ("--markdown", OutputFormat::Markdown),
            ("-i", OutputFormat::Ics),
            ("--ics", OutputFormat::Ics),
        ] {
            let cli = Cli::try_parse_from(["test", flag]).unwrap();
            assert_eq!(cli.format, Some(format), "flag {flag}");
        }
    }

    #[test]
    fn test_output_formats_are_exclusive() {
        let err = Cli::try_parse_from(["test", "-j", "-m"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert!(err.use_stderr());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["test", "--strict", "--verbose"]).unwrap();
        assert!(cli.strict);
        assert!(cli.verbose);
    }

    #[test]
    fn test_help_and_version_are_not_failures() {
        let err = Cli::try_parse_from(["test", "-v"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert!(!err.use_stderr());

        let err = Cli::try_parse_from(["test", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_unknown_argument_is_usage_error() {
        let err = Cli::try_parse_from(["test", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(err.use_stderr());
    }

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_input(Some(Path::new("/nonexistent/cical/input.ics")))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open"));
    }

    #[tokio::test]
    async fn test_run_writes_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.ics");
        let output = dir.path().join("out.json");
        let config = dir.path().join("config.toml");
        std::fs::write(&input, "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n").unwrap();
        std::fs::write(&config, "").unwrap();

        let cli = Cli {
            file: Some(input),
            output: Some(output.clone()),
            format: Some(OutputFormat::Json),
            config: Some(config),
            strict: false,
            verbose: false,
        };
        cli.run().await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json[0]["name"], "VCALENDAR");
        assert_eq!(json[0]["prop"][0]["value"], "2.0");
    }

    #[tokio::test]
    async fn test_run_strict_flag_rejects_mismatched_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.ics");
        let config = dir.path().join("config.toml");
        std::fs::write(&input, "BEGIN:VCALENDAR\nBEGIN:VEVENT\nEND:VTODO\nEND:VCALENDAR\n").unwrap();
        std::fs::write(&config, "").unwrap();

        let cli = Cli {
            file: Some(input),
            output: Some(dir.path().join("out.md")),
            format: None,
            config: Some(config),
            strict: true,
            verbose: false,
        };
        let err = cli.run().await.unwrap_err();
        assert!(err.to_string().contains("VTODO"));
    }
}
