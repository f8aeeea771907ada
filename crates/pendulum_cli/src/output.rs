//! Snapshot printing.

use std::io::Write;

use anyhow::{Context, Result};
use pendulum::{Parameter, PhysicsState};

use crate::cli::Format;

const COLUMN_WIDTH: usize = 18;

/// Writes snapshots as a table or as JSON lines.
pub struct SnapshotWriter<W: Write> {
    out: W,
    format: Format,
    columns: Vec<Parameter>,
    header_written: bool,
    rows: u64,
}

impl<W: Write> SnapshotWriter<W> {
    /// Creates a writer. `columns` only affects the table format; time is
    /// always the first column and is dropped from `columns` if repeated.
    pub fn new(out: W, format: Format, columns: &[Parameter]) -> Self {
        let mut unique: Vec<Parameter> = Vec::with_capacity(columns.len());
        for &column in columns {
            if column != Parameter::Time && !unique.contains(&column) {
                unique.push(column);
            }
        }
        Self {
            out,
            format,
            columns: unique,
            header_written: false,
            rows: 0,
        }
    }

    /// Writes one snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write(&mut self, state: &PhysicsState) -> Result<()> {
        match self.format {
            Format::Table => self.write_row(state)?,
            Format::Json => {
                serde_json::to_writer(&mut self.out, state).context("failed to encode snapshot")?;
                writeln!(self.out).context("failed to write snapshot")?;
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Number of snapshots written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flushes and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush().context("failed to flush output")?;
        Ok(self.out)
    }

    fn write_row(&mut self, state: &PhysicsState) -> Result<()> {
        if !self.header_written {
            let mut header = format!("{:>COLUMN_WIDTH$}", Parameter::Time.key());
            for column in &self.columns {
                header.push_str(&format!("{:>COLUMN_WIDTH$}", column.key()));
            }
            writeln!(self.out, "{header}").context("failed to write table header")?;
            self.header_written = true;
        }

        let mut row = format!("{:>COLUMN_WIDTH$.3}", state.time());
        for &column in &self.columns {
            row.push_str(&format!("{:>COLUMN_WIDTH$.6}", state.value(column)));
        }
        writeln!(self.out, "{row}").context("failed to write table row")?;
        Ok(())
    }
}

/// Prints the selectable parameters, one `key  label` pair per line.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_parameter_list(mut out: impl Write) -> Result<()> {
    for parameter in Parameter::SELECTABLE {
        writeln!(out, "{:<18}{}", parameter.key(), parameter.label())
            .context("failed to write parameter list")?;
    }
    Ok(())
}
