//! Output formatting for the PPI CLI.
//!
//! Every command renders through [`Output`], which picks between a
//! human-readable table and machine-readable JSON. Colors and truncation
//! follow TTY detection unless overridden.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::str::FromStr;

mod json;
mod table;

pub use self::json::JsonOutput;
pub use self::table::TableOutput;

const DEFAULT_WIDTH: usize = 80;
const ELLIPSIS: &str = "...";

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tables and headings for people
    #[default]
    Table,
    /// JSON for scripts and other tools
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("table") {
            Ok(Self::Table)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(format!("unknown output format '{}' (expected table or json)", value))
        }
    }
}

/// Resolved rendering settings.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Plain text, no ANSI colors
    pub no_color: bool,
    /// Print long cells in full
    pub no_truncate: bool,
    /// Fixed width; `None` asks the terminal
    pub width: Option<usize>,
    /// Single-line JSON
    pub compact: bool,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
            no_truncate: false,
            width: None,
            compact: false,
        }
    }

    /// Settings for the current stdout.
    ///
    /// Piped output is never truncated and is uncolored unless `color` says
    /// otherwise.
    pub fn for_stdout(format: OutputFormat, color: Option<bool>) -> Self {
        let tty = std::io::stdout().is_terminal();
        Self {
            no_color: !color.unwrap_or(tty),
            no_truncate: !tty,
            ..Self::new(format)
        }
    }

    /// Width tables are wrapped to.
    pub fn table_width(&self) -> usize {
        match self.width {
            Some(width) => width,
            None => terminal_size::terminal_size().map_or(DEFAULT_WIDTH, |(w, _)| w.0 as usize),
        }
    }

    pub fn truncates(&self) -> bool {
        !self.no_truncate
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

/// Command results that know how to print themselves.
pub trait Outputter: Serialize {
    fn to_table(&self, config: &OutputConfig) -> String;

    fn to_json(&self, config: &OutputConfig) -> String {
        JsonOutput::format(self, config)
    }

    fn render(&self, config: &OutputConfig) -> String {
        match config.format {
            OutputFormat::Table => self.to_table(config),
            OutputFormat::Json => self.to_json(config),
        }
    }
}

impl<T: Outputter + ?Sized> Outputter for &T {
    fn to_table(&self, config: &OutputConfig) -> String {
        (**self).to_table(config)
    }
}

/// Result wrapper that renders data with a resolved [`OutputConfig`].
pub struct Output<T> {
    data: T,
    config: OutputConfig,
}

impl<T: Outputter> Output<T> {
    pub fn new(data: T, config: OutputConfig) -> Self {
        Self { data, config }
    }

    /// Print to stdout.
    pub fn render(&self) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", self.to_text())?;
        Ok(())
    }

    pub fn to_text(&self) -> String {
        self.data.render(&self.config)
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut short: String = text.chars().take(keep).collect();
    if max > ELLIPSIS.len() {
        short.push_str(ELLIPSIS);
    }
    short
}

/// Format a ratio in `[0, 1]` as a percentage.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
