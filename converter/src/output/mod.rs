//! Hourly counts CSV: the file format the simulation engine reads and writes.
//!
//! ```text
//! hour,susceptible,exposed,infected,hospitalized,recovered,deceased
//! 0,198051,0,0,0,0,0
//! ```
//!
//! The header is always written, even for an empty series, and there is no
//! index column. File writes go through a temporary file in the destination
//! directory that is renamed into place, so a failed run leaves no partial
//! output behind. The renamed file gets the permissions a plain create would
//! give it, or keeps those of the file it replaces.

use csv::{ReaderBuilder, WriterBuilder};
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

use crate::error::{OutputError, OutputResult};
use crate::models::CompartmentCounts;

/// Write counts as CSV to any writer.
pub fn write_counts<W: Write>(writer: W, rows: &[CompartmentCounts]) -> OutputResult<()> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(CompartmentCounts::COLUMNS)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Render counts as a CSV string.
pub fn counts_to_csv_string(rows: &[CompartmentCounts]) -> OutputResult<String> {
    let mut buf = Vec::new();
    write_counts(&mut buf, rows)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Atomically write counts to `path`.
pub fn write_counts_file(path: impl AsRef<Path>, rows: &[CompartmentCounts]) -> OutputResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    builder.prefix(".casecounts-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // 0666 before umask, same as File::create
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir)?;
    #[cfg(unix)]
    {
        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
    }

    write_counts(tmp.as_file_mut(), rows)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Read a counts CSV, checking the header matches the expected columns exactly.
pub fn read_counts<R: std::io::Read>(reader: R) -> OutputResult<Vec<CompartmentCounts>> {
    let mut csv = ReaderBuilder::new().from_reader(reader);

    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    if headers != CompartmentCounts::COLUMNS {
        return Err(OutputError::Header(headers));
    }

    csv.deserialize::<CompartmentCounts>()
        .map(|row| row.map_err(OutputError::from))
        .collect()
}

/// Read a counts CSV file.
pub fn read_counts_file(path: impl AsRef<Path>) -> OutputResult<Vec<CompartmentCounts>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_counts(std::io::BufReader::new(file))
}
