// src/output/mod.rs
pub mod write;

use csv::{Terminator, WriterBuilder};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::change::{compute_changes, normalize, ChangeFormat, Value};
use crate::config::Layout;
use crate::error::{Error, Result};
use crate::table::{Columns, InputTable};

pub use write::write_atomic;

/// Id of the blank column between original and change columns.
pub const SEPARATOR_ID: &str = "separator";

/// One output column: `id` keys the row maps, `title` goes in the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub id: String,
    pub title: String,
}

impl HeaderField {
    fn same(name: &str) -> Self {
        Self {
            id: name.to_string(),
            title: name.to_string(),
        }
    }
}

pub type OutputRow = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputTable {
    pub header: Vec<HeaderField>,
    pub rows: Vec<OutputRow>,
}

/// Column ids and titles for a run.
pub fn build_header(columns: &Columns, layout: Layout, separator: bool) -> Vec<HeaderField> {
    let mut header = vec![HeaderField::same(&columns.entity_title)];
    let changed = columns.years.iter().skip(1);
    match layout {
        Layout::ChangesOnly => {
            header.extend(changed.map(|y| HeaderField::same(&y.label)));
        }
        Layout::KeepOriginal => {
            header.extend(columns.years.iter().map(|y| HeaderField::same(&y.label)));
            if separator {
                header.push(HeaderField {
                    id: SEPARATOR_ID.into(),
                    title: String::new(),
                });
            }
            header.extend(changed.map(|y| HeaderField::same(&change_id(&y.label))));
        }
    }
    header
}

fn change_id(label: &str) -> String {
    format!("{}_change", label)
}

/// Compute every row's changes and lay them out per `layout`. Rows keep the
/// input order.
pub fn assemble(
    table: &InputTable,
    columns: &Columns,
    layout: Layout,
    separator: bool,
    format: &ChangeFormat,
) -> OutputTable {
    let header = build_header(columns, layout, separator);

    let rows = table
        .rows()
        .iter()
        .map(|cells| {
            let mut out = OutputRow::with_capacity(header.len());
            out.insert(
                columns.entity_title.clone(),
                cells[columns.entity_index].clone(),
            );

            let values: Vec<Value> = columns
                .years
                .iter()
                .map(|y| normalize(&cells[y.index]))
                .collect();
            let changes = compute_changes(&values);

            match layout {
                Layout::ChangesOnly => {
                    for (year, change) in columns.years.iter().skip(1).zip(changes) {
                        out.insert(year.label.clone(), format.render(change));
                    }
                }
                Layout::KeepOriginal => {
                    for year in &columns.years {
                        out.insert(year.label.clone(), cells[year.index].clone());
                    }
                    if separator {
                        out.insert(SEPARATOR_ID.into(), String::new());
                    }
                    for (year, change) in columns.years.iter().skip(1).zip(changes) {
                        out.insert(change_id(&year.label), format.render(change));
                    }
                }
            }
            out
        })
        .collect();

    OutputTable { header, rows }
}

impl OutputTable {
    /// Check that header ids are unique and every row has exactly those keys.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.header.len());
        for field in &self.header {
            if !ids.insert(field.id.as_str()) {
                return Err(Error::SchemaMismatch {
                    row: 0,
                    detail: format!("duplicate header id `{}`", field.id),
                });
            }
        }

        for (idx, row) in self.rows.iter().enumerate() {
            let mut missing: Vec<&str> = ids
                .iter()
                .copied()
                .filter(|id| !row.contains_key(*id))
                .collect();
            let mut extra: Vec<&str> = row
                .keys()
                .map(String::as_str)
                .filter(|k| !ids.contains(k))
                .collect();
            if !missing.is_empty() || !extra.is_empty() {
                missing.sort_unstable();
                extra.sort_unstable();
                return Err(Error::SchemaMismatch {
                    row: idx + 1,
                    detail: format!("missing keys {:?}, unexpected keys {:?}", missing, extra),
                });
            }
        }
        Ok(())
    }

    /// Render the whole table as CSV. Nothing is produced unless every row
    /// lines up with the header.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        wtr.write_record(self.header.iter().map(|f| f.title.as_str()))?;
        for row in &self.rows {
            wtr.write_record(self.header.iter().map(|f| row[&f.id].as_str()))?;
        }
        let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        debug!(
            rows = self.rows.len(),
            columns = self.header.len(),
            bytes = bytes.len(),
            "serialized output"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntityColumn, YearOrder};
    use crate::table::{classify_columns, read_table};
    use std::io::Cursor;
    use std::path::Path;

    fn run(text: &str, layout: Layout, separator: bool) -> String {
        let table = read_table(Cursor::new(text.as_bytes()), Path::new("t.csv")).unwrap();
        let columns = classify_columns(
            &table,
            &EntityColumn::Match("country".into()),
            YearOrder::FileOrder,
        )
        .unwrap();
        let out = assemble(&table, &columns, layout, separator, &ChangeFormat::default());
        String::from_utf8(out.to_csv_bytes().unwrap()).unwrap()
    }

    #[test]
    fn changes_only_example() {
        let csv = run(
            "Country,2019,2020\nAfghanistan,18.876,20.136\nX,no data,5\nY,0,0\nZ,0,5\n",
            Layout::ChangesOnly,
            true,
        );
        assert_eq!(
            csv,
            "Country,2020\nAfghanistan,6.68\nX,\nY,0.00\nZ,N/A\n"
        );
    }

    #[test]
    fn keep_original_with_separator() {
        let csv = run(
            "2019,2020,2021,Country,\n1,2,no data,Albania,\n",
            Layout::KeepOriginal,
            true,
        );
        assert_eq!(
            csv,
            "Country,2019,2020,2021,,2020_change,2021_change\nAlbania,1,2,no data,,100.00,\n"
        );
    }

    #[test]
    fn keep_original_without_separator() {
        let csv = run("Country,2019,2020\nA,4,3\n", Layout::KeepOriginal, false);
        assert_eq!(csv, "Country,2019,2020,2020_change\nA,4,3,-25.00\n");
    }

    #[test]
    fn entity_values_are_quoted_when_needed() {
        let csv = run(
            "Country,2019,2020\n\"Korea, Republic of\",2,3\n",
            Layout::ChangesOnly,
            false,
        );
        assert_eq!(csv, "Country,2020\n\"Korea, Republic of\",50.00\n");
    }

    #[test]
    fn row_and_column_counts() {
        let text = "Country,2018,2019,2020,2021\nA,1,2,3,4\nB,,,,\nC,1,1,1,1\n";
        let table = read_table(Cursor::new(text.as_bytes()), Path::new("t.csv")).unwrap();
        let columns = classify_columns(&table, &EntityColumn::First, YearOrder::FileOrder).unwrap();
        let out = assemble(
            &table,
            &columns,
            Layout::ChangesOnly,
            false,
            &ChangeFormat::default(),
        );
        assert_eq!(out.rows.len(), table.rows().len());
        assert_eq!(out.header.len() - 1, columns.years.len() - 1);
        assert_eq!(out.rows[1]["2021"], "");
        assert_eq!(out.rows[2]["2019"], "0.00");
    }

    #[test]
    fn missing_key_is_schema_mismatch() {
        let mut out = OutputTable {
            header: vec![HeaderField::same("Country"), HeaderField::same("2020")],
            rows: vec![OutputRow::new()],
        };
        out.rows[0].insert("Country".into(), "A".into());
        let err = out.to_csv_bytes().unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { row: 1, .. }));
    }

    #[test]
    fn extra_key_is_schema_mismatch() {
        let mut row = OutputRow::new();
        row.insert("Country".into(), "A".into());
        row.insert("2021".into(), "1.00".into());
        let out = OutputTable {
            header: vec![HeaderField::same("Country")],
            rows: vec![row],
        };
        assert!(matches!(
            out.to_csv_bytes(),
            Err(Error::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_header_id_is_schema_mismatch() {
        let out = OutputTable {
            header: vec![HeaderField::same("2020"), HeaderField::same("2020")],
            rows: Vec::new(),
        };
        assert!(matches!(
            out.validate(),
            Err(Error::SchemaMismatch { row: 0, .. })
        ));
    }
}
