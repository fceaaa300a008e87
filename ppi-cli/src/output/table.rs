//! Terminal tables built with `tabled`.

use super::{truncate, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Cells longer than this are truncated on a TTY.
const MAX_CELL_WIDTH: usize = 60;

pub struct TableOutput;

impl TableOutput {
    /// A rounded table with a header row. Empty input prints `(no results)`.
    pub fn from_rows(headers: &[&str], rows: &[Vec<String>], config: &OutputConfig) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            if config.truncates() {
                builder.push_record(row.iter().map(|s| truncate(s, MAX_CELL_WIDTH)));
            } else {
                builder.push_record(row.iter().map(|s| s.as_str()));
            }
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        if config.truncates() {
            table.with(Width::wrap(config.table_width()));
        }

        table.to_string()
    }

    /// Two-column table with right-aligned keys.
    pub fn format_key_value(pairs: &[(&str, String)], config: &OutputConfig) -> String {
        let mut builder = Builder::default();

        for (key, value) in pairs {
            builder.push_record([*key, value.as_str()]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.with(Modify::new(Columns::first()).with(Alignment::right()));

        if config.truncates() {
            table.with(Width::wrap(config.table_width()));
        }

        table.to_string()
    }
}
