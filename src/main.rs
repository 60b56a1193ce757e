use anyhow::{Context, Result};
use clap::Parser;
use gdpdelta::{
    config::{Layout, Overrides, YearOrder},
    pipeline, Config,
};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compute year-over-year GDP percentage change per country"
)]
struct Args {
    /// YAML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory searched for the input table
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Fraction digits for change values
    #[arg(short, long)]
    precision: Option<usize>,
    #[arg(long, value_enum)]
    layout: Option<Layout>,
    /// Case-insensitive substring identifying the entity column
    #[arg(long, conflicts_with = "first_column_entity")]
    entity_column: Option<String>,
    /// Always use the first column as the entity column
    #[arg(long)]
    first_column_entity: bool,
    #[arg(long, value_enum)]
    year_order: Option<YearOrder>,
    /// Text written when a year pair has a missing value
    #[arg(long)]
    no_result: Option<String>,
    /// Text written when the previous year is zero and the current is not
    #[arg(long)]
    not_applicable: Option<String>,
    /// Omit the blank column between original and change columns
    #[arg(long)]
    no_separator: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        config.apply_overrides(self.overrides());
        Ok(config)
    }

    fn overrides(self) -> Overrides {
        Overrides {
            input_dir: self.input_dir,
            output_path: self.output,
            precision: self.precision,
            layout: self.layout,
            entity_column: self.entity_column,
            first_column_entity: self.first_column_entity,
            year_order: self.year_order,
            no_result: self.no_result,
            not_applicable: self.not_applicable,
            no_separator: self.no_separator,
        }
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = Args::parse().into_config()?;
    config.validate().context("checking configuration")?;

    // ─── directories the run reads from and writes to ───────────────
    fs::create_dir_all(&config.input_dir)
        .with_context(|| format!("creating {}", config.input_dir.display()))?;
    if let Some(dist) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dist).with_context(|| format!("creating {}", dist.display()))?;
    }

    let summary = pipeline::run(&config).context("computing GDP percentage change")?;
    info!(
        input = %summary.input.display(),
        output = %summary.output.display(),
        rows = summary.rows,
        change_columns = summary.change_columns,
        "done"
    );
    Ok(())
}
