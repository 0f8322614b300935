//! Column file reading and writing.
//!
//! Input files hold one sample per row and one channel per column, separated by
//! commas or whitespace.  Blank lines and `#` comments are ignored, and a
//! non-numeric first row is taken as a header.

use anyhow::{Context, Result};
use lib_types::units::Seconds;
use std::io::Write;
use std::path::Path;

/// Read all columns of a file.
pub fn read_columns(path: &Path) -> Result<Vec<Vec<f64>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {:?}", path))?;
    parse_columns(&content).with_context(|| format!("Failed to parse data file: {:?}", path))
}

/// Read a single column (0-based) of a file.
pub fn read_column(path: &Path, column: usize) -> Result<Vec<f64>> {
    let mut columns = read_columns(path)?;
    if column >= columns.len() {
        anyhow::bail!("Column {} out of range: {:?} has {} columns", column, path, columns.len());
    }
    Ok(columns.swap_remove(column))
}

/// Parse column text.
pub fn parse_columns(content: &str) -> Result<Vec<Vec<f64>>> {
    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut seen_row = false;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        let values: Result<Vec<f64>, _> = fields.iter().map(|f| f.parse::<f64>()).collect();
        let values = match values {
            Ok(values) => values,
            Err(_) if !seen_row => {
                seen_row = true;
                tracing::debug!("Skipping header: {}", line);
                continue;
            }
            Err(e) => anyhow::bail!("Line {}: {}", line_no + 1, e),
        };

        if columns.is_empty() {
            columns = vec![Vec::new(); values.len()];
        } else if values.len() != columns.len() {
            anyhow::bail!(
                "Line {}: expected {} columns, found {}",
                line_no + 1,
                columns.len(),
                values.len()
            );
        }

        for (column, v) in columns.iter_mut().zip(values) {
            column.push(v);
        }
        seen_row = true;
    }

    if columns.is_empty() {
        anyhow::bail!("No data rows found");
    }
    Ok(columns)
}

/// Write equal-interval columns as CSV with a leading time column.
///
/// Shorter columns are padded with empty fields.
pub fn write_columns<W: Write>(
    writer: &mut W,
    names: &[String],
    columns: &[&[f64]],
    dt: Seconds,
    t_start: Seconds,
) -> Result<()> {
    write!(writer, "time")?;
    for name in names {
        write!(writer, ",{}", name)?;
    }
    writeln!(writer)?;

    let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    for i in 0..rows {
        write!(writer, "{}", (t_start + dt * i as f64).0)?;
        for column in columns {
            match column.get(i) {
                Some(v) => write!(writer, ",{}", v)?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}
