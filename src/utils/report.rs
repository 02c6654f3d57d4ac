//! Rendering report rows as CSV, JSON or a terminal table.

use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

use crate::models::{ReportRow, REPORT_COLUMNS};

/// Message shown instead of a report when nothing qualified
pub const NO_RESULTS_MESSAGE: &str = "No papers found with non-academic authors.";

/// Output format for the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// Array of objects keyed by column name
    Json,
    /// Human-readable table
    Table,
}

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `rows` to `out` in the requested format.
///
/// The header is always written, even for an empty row set; callers decide
/// whether to print [`NO_RESULTS_MESSAGE`] instead.
pub fn write_report<W: Write>(
    rows: &[ReportRow],
    format: ReportFormat,
    mut out: W,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(REPORT_COLUMNS)?;
            for row in rows {
                writer.write_record(row.cells())?;
            }
            writer.flush()?;
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
            out.flush()?;
        }
        ReportFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(REPORT_COLUMNS.to_vec());
            for row in rows {
                table.add_row(row.cells().into_iter().map(Cell::new).collect::<Vec<_>>());
            }
            writeln!(out, "{table}")?;
            out.flush()?;
        }
    }

    Ok(())
}
