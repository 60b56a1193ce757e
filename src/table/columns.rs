use std::collections::HashSet;
use tracing::{debug, warn};

use super::InputTable;
use crate::config::{EntityColumn, YearOrder};
use crate::error::{Error, Result};

/// One year column: where it sits in the row and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearColumn {
    pub index: usize,
    /// Header text with surrounding whitespace removed.
    pub label: String,
    pub year: i64,
}

/// Roles of the input columns, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub entity_index: usize,
    pub entity_title: String,
    pub years: Vec<YearColumn>,
}

/// Pick the entity column and the year columns out of the header.
///
/// Year columns are headers that parse as an integer after trimming. They
/// keep their left-to-right order; with `YearOrder::FileOrder` a change is
/// between adjacent columns even if the labels are not chronological.
pub fn classify_columns(
    table: &InputTable,
    entity: &EntityColumn,
    order: YearOrder,
) -> Result<Columns> {
    let headers = table.headers();
    let entity_index = match entity {
        EntityColumn::First => 0,
        EntityColumn::Match(needle) => {
            let needle = needle.to_lowercase();
            headers
                .iter()
                .position(|h| h.to_lowercase().contains(&needle))
                .unwrap_or_else(|| {
                    warn!(
                        needle = %needle,
                        "no header matches entity column, using first column `{}`",
                        headers[0]
                    );
                    0
                })
        }
    };

    let mut seen = HashSet::new();
    let mut years = Vec::new();
    for (index, raw) in headers.iter().enumerate() {
        if index == entity_index {
            continue;
        }
        let label = raw.trim();
        let Ok(year) = label.parse::<i64>() else {
            debug!(column = %raw, "not a year column");
            continue;
        };
        if !seen.insert(year) {
            warn!(column = %label, "duplicate year column ignored");
            continue;
        }
        years.push(YearColumn {
            index,
            label: label.to_string(),
            year,
        });
    }

    if let Some(pair) = years.windows(2).find(|w| w[1].year <= w[0].year) {
        match order {
            YearOrder::StrictAscending => {
                return Err(Error::UnorderedYears {
                    previous: pair[0].label.clone(),
                    current: pair[1].label.clone(),
                });
            }
            YearOrder::FileOrder => warn!(
                previous = %pair[0].label,
                current = %pair[1].label,
                "year columns are not ascending; changes follow column order"
            ),
        }
    }

    debug!(
        entity = %headers[entity_index],
        years = years.len(),
        "classified columns"
    );
    Ok(Columns {
        entity_index,
        entity_title: headers[entity_index].clone(),
        years,
    })
}
