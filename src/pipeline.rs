// src/pipeline.rs

use std::path::PathBuf;
use tracing::info;

use crate::{
    change::ChangeFormat,
    config::Config,
    discover::find_input,
    error::Result,
    output::{assemble, write_atomic},
    table::{classify_columns, load_table},
};

/// What a run read and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub year_columns: usize,
    pub change_columns: usize,
}

/// Discover the input table, compute year-over-year changes, and replace the
/// output file. The output is fully rendered before anything touches disk.
pub fn run(config: &Config) -> Result<RunSummary> {
    config.validate()?;

    let input = find_input(&config.input_dir, &config.extension)?;
    let table = load_table(&input)?;
    let columns = classify_columns(&table, &config.entity_column, config.year_order)?;
    info!(
        entity = %columns.entity_title,
        years = columns.years.len(),
        "using entity column and year columns"
    );

    let format = ChangeFormat::from_config(config);
    let output = assemble(
        &table,
        &columns,
        config.layout,
        config.separator_column,
        &format,
    );
    let bytes = output.to_csv_bytes()?;
    write_atomic(&config.output_path, &bytes)?;

    Ok(RunSummary {
        input,
        output: config.output_path.clone(),
        rows: output.rows.len(),
        year_columns: columns.years.len(),
        change_columns: columns.years.len().saturating_sub(1),
    })
}
