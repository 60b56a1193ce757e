// src/table/mod.rs
pub mod columns;

use csv::{ByteRecord, ReaderBuilder};
use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::error::{Error, Result};

pub use columns::{classify_columns, Columns, YearColumn};

/// A wide-format table held fully in memory.
///
/// Every row has exactly `headers.len()` cells, and there is at least one
/// header and one row.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTable {
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl InputTable {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(
        source: impl Into<PathBuf>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self> {
        let source = source.into();
        if headers.is_empty() || rows.is_empty() {
            return Err(Error::EmptyInput { path: source });
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, mut row)| {
                if row.len() != width {
                    warn!(
                        row = idx + 1,
                        cells = row.len(),
                        headers = width,
                        "row width differs from header, aligning"
                    );
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        Ok(Self {
            source,
            headers,
            rows,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell of `row` under the column called `name` (first match).
    #[cfg(test)]
    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| h == name)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }
}

/// Read a delimited text table from `path`.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<InputTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_table(BufReader::new(file), path)?;
    info!(
        "CSV file {} successfully processed: {} rows, {} columns",
        table.source().display(),
        table.rows.len(),
        table.headers.len()
    );
    Ok(table)
}

/// Read a header row plus data rows from any reader; `source` is only used
/// for error reporting.
pub fn read_table<R: Read>(reader: R, source: &Path) -> Result<InputTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = decode_record(rdr.byte_headers()?, 0);
    let rows = rdr
        .byte_records()
        .enumerate()
        .map(|(idx, record)| -> Result<Vec<String>> {
            Ok(decode_record(&record?, idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    InputTable::new(source, headers, rows)
}

/// Fields as text; bytes that are not UTF-8 (e.g. Latin-1 exports) become
/// U+FFFD instead of failing the run. `row` 0 is the header.
fn decode_record(record: &ByteRecord, row: usize) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(col, field)| match String::from_utf8_lossy(field) {
            Cow::Borrowed(s) => s.to_string(),
            Cow::Owned(s) => {
                warn!(
                    row,
                    column = col + 1,
                    "cell is not valid UTF-8, decoding lossily"
                );
                s
            }
        })
        .collect()
}
