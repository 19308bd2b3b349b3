//! Delimited table output
//!
//! Rows are written as comma-separated values with a header line. Floats
//! use Rust's shortest round-trip formatting.

use crate::error::Result;
use crate::vector::WidthRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A record that can be written as one CSV row.
pub trait TableRow {
    /// Header line, without the trailing newline
    fn header() -> &'static str;

    /// Write the row fields, without the trailing newline
    fn write_row<W: Write>(&self, out: &mut W) -> std::io::Result<()>;
}

impl TableRow for WidthRecord {
    fn header() -> &'static str {
        "polygon_id,distance,width"
    }

    fn write_row<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{},{},{}", self.polygon_id, self.distance, self.width)
    }
}

/// Write a header and one line per row.
pub fn write_table<W: Write, R: TableRow>(writer: W, rows: &[R]) -> Result<()> {
    let mut out = BufWriter::new(writer);
    writeln!(out, "{}", R::header())?;
    for row in rows {
        row.write_row(&mut out)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the table to it.
pub fn write_table_file<P: AsRef<Path>, R: TableRow>(path: P, rows: &[R]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_table(file, rows)
}
