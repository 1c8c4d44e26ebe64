//! Export writers: one CSV file per day sheet, or aligned tables on stdout.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gymgenius_core::export::{COLUMN_HEADERS, DaySheet};

/// File name prefix for exported sheets.
const FILE_PREFIX: &str = "GymGenius-Rutina";

/// Write each sheet to `<dir>/GymGenius-Rutina-<sheet>.csv`.
///
/// Returns the written paths in sheet order.
pub fn write_sheets(sheets: &[DaySheet], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create export directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let path = dir.join(format!("{FILE_PREFIX}-{}.csv", sheet.name));
        let file = File::create(&path)
            .with_context(|| format!("cannot create output file: {}", path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        write_rows(sheet, &mut writer)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), rows = sheet.rows.len(), "wrote sheet");
        written.push(path);
    }
    Ok(written)
}

/// Serialize the rows of one sheet; the header row comes from the row type.
fn write_rows<W: Write>(sheet: &DaySheet, writer: &mut csv::Writer<W>) -> Result<()> {
    for row in &sheet.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render one sheet as a fixed-width table under a `# <label>` line.
pub fn format_table(sheet: &DaySheet) -> String {
    let [w0, w1, w2] = sheet.column_widths();
    let mut out = String::new();
    let _ = writeln!(out, "# {}", sheet.label);
    let [h0, h1, h2] = COLUMN_HEADERS;
    let _ = writeln!(out, "{}", format!("{h0:<w0$}{h1:<w1$}{h2:<w2$}").trim_end());
    for row in &sheet.rows {
        let line = format!("{:<w0$}{:<w1$}{:<w2$}", row.exercise, row.sets, row.rep_range);
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// Print every sheet to stdout as an aligned table.
pub fn print_sheets(sheets: &[DaySheet]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for sheet in sheets {
        writeln!(out, "{}", format_table(sheet))?;
    }
    Ok(())
}
