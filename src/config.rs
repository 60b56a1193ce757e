//! Run configuration: defaults, optional YAML file, validation.
//!
//! ```yaml
//! input_dir: input
//! output_path: dist/gdp_percentage_change.csv
//! precision: 4
//! layout: keep_original
//! entity_column: { match: country }
//! ```
use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Widest fraction-digit setting accepted for change values.
pub const MAX_PRECISION: usize = 8;

/// Which columns end up in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Entity column, then one change column per year titled with the bare year.
    #[default]
    ChangesOnly,
    /// Entity column, every original year column, then `<year>_change` columns.
    KeepOriginal,
}

/// How the entity (row key) column is picked from the header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityColumn {
    First,
    /// Case-insensitive substring match; falls back to the first column.
    Match(String),
}

impl Default for EntityColumn {
    fn default() -> Self {
        EntityColumn::Match("country".into())
    }
}

/// Whether year columns must be chronological in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum YearOrder {
    /// Trust the file's column order; changes are between adjacent columns.
    #[default]
    FileOrder,
    /// Reject inputs whose year labels are not strictly increasing.
    StrictAscending,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input_dir: PathBuf,
    pub extension: String,
    pub output_path: PathBuf,
    pub precision: usize,
    pub layout: Layout,
    pub separator_column: bool,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub entity_column: EntityColumn,
    pub year_order: YearOrder,
    /// Rendered when either side of a year pair has no value.
    pub no_result: String,
    /// Rendered when the previous year is zero and the current one is not.
    pub not_applicable: String,
}

/// Values given on the command line; `None`/`false` means not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub precision: Option<usize>,
    pub layout: Option<Layout>,
    pub entity_column: Option<String>,
    pub first_column_entity: bool,
    pub year_order: Option<YearOrder>,
    pub no_result: Option<String>,
    pub not_applicable: Option<String>,
    pub no_separator: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            extension: "csv".into(),
            output_path: PathBuf::from("dist").join("gdp_percentage_change.csv"),
            precision: 2,
            layout: Layout::default(),
            separator_column: true,
            entity_column: EntityColumn::default(),
            year_order: YearOrder::default(),
            no_result: String::new(),
            not_applicable: "N/A".into(),
        }
    }
}

impl Config {
    /// Load a YAML config file; keys left out keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Layer command-line values over this config. Unset fields keep the
    /// current value; `first_column_entity` wins over `entity_column`.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.input_dir {
            self.input_dir = v;
        }
        if let Some(v) = overrides.output_path {
            self.output_path = v;
        }
        if let Some(v) = overrides.precision {
            self.precision = v;
        }
        if let Some(v) = overrides.layout {
            self.layout = v;
        }
        if let Some(v) = overrides.entity_column {
            self.entity_column = EntityColumn::Match(v);
        }
        if overrides.first_column_entity {
            self.entity_column = EntityColumn::First;
        }
        if let Some(v) = overrides.year_order {
            self.year_order = v;
        }
        if let Some(v) = overrides.no_result {
            self.no_result = v;
        }
        if let Some(v) = overrides.not_applicable {
            self.not_applicable = v;
        }
        if overrides.no_separator {
            self.separator_column = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(Error::Config(format!(
                "precision {} is above the maximum of {}",
                self.precision, MAX_PRECISION
            )));
        }
        if self.no_result == self.not_applicable {
            return Err(Error::Config(format!(
                "no_result and not_applicable must differ (both are {:?})",
                self.no_result
            )));
        }
        if self.extension.trim().is_empty() {
            return Err(Error::Config("extension must not be empty".into()));
        }
        if let EntityColumn::Match(needle) = &self.entity_column {
            if needle.trim().is_empty() {
                return Err(Error::Config("entity_column match must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.precision, 2);
        assert_eq!(config.layout, Layout::ChangesOnly);
        assert_eq!(config.entity_column, EntityColumn::Match("country".into()));
    }

    #[test]
    fn example_file_spells_out_the_defaults() {
        let config = Config::from_yaml_str(include_str!("../gdpdelta.example.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn yaml_overrides_only_named_keys() {
        let config = Config::from_yaml_str(
            "precision: 4\nlayout: keep_original\nentity_column: first\nyear_order: strict_ascending\n",
        )
        .unwrap();
        assert_eq!(config.precision, 4);
        assert_eq!(config.layout, Layout::KeepOriginal);
        assert_eq!(config.entity_column, EntityColumn::First);
        assert_eq!(config.year_order, YearOrder::StrictAscending);
        assert_eq!(config.not_applicable, "N/A");
        assert_eq!(config.input_dir, PathBuf::from("input"));
    }

    #[test]
    fn yaml_match_entity_column() {
        let config = Config::from_yaml_str("entity_column:\n  match: nation\n").unwrap();
        assert_eq!(config.entity_column, EntityColumn::Match("nation".into()));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            Config::from_yaml_str("precison: 4\n"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn overrides_beat_yaml_and_unset_keeps_yaml() {
        let mut config = Config::from_yaml_str(
            "precision: 4\nlayout: keep_original\nno_result: \"-\"\nentity_column:\n  match: nation\n",
        )
        .unwrap();
        config.apply_overrides(Overrides {
            precision: Some(2),
            output_path: Some(PathBuf::from("out/x.csv")),
            ..Overrides::default()
        });
        assert_eq!(config.precision, 2);
        assert_eq!(config.output_path, PathBuf::from("out/x.csv"));
        assert_eq!(config.layout, Layout::KeepOriginal);
        assert_eq!(config.no_result, "-");
        assert_eq!(config.entity_column, EntityColumn::Match("nation".into()));
        assert!(config.separator_column);
    }

    #[test]
    fn first_column_flag_wins_over_match() {
        let mut config = Config::default();
        config.apply_overrides(Overrides {
            entity_column: Some("region".into()),
            first_column_entity: true,
            ..Overrides::default()
        });
        assert_eq!(config.entity_column, EntityColumn::First);
    }

    #[test]
    fn no_separator_and_markers_override() {
        let mut config = Config::default();
        config.apply_overrides(Overrides {
            no_separator: true,
            no_result: Some("N/A".into()),
            not_applicable: Some("undefined".into()),
            year_order: Some(YearOrder::StrictAscending),
            ..Overrides::default()
        });
        assert!(!config.separator_column);
        assert_eq!(config.no_result, "N/A");
        assert_eq!(config.not_applicable, "undefined");
        assert_eq!(config.year_order, YearOrder::StrictAscending);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overridden_markers_are_still_validated() {
        let mut config = Config::default();
        config.apply_overrides(Overrides {
            not_applicable: Some(String::new()),
            ..Overrides::default()
        });
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn empty_extension_is_rejected() {
        let config = Config {
            extension: "  ".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn empty_entity_match_is_rejected() {
        let config = Config {
            entity_column: EntityColumn::Match(" ".into()),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn markers_must_differ() {
        let config = Config {
            no_result: "N/A".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn precision_is_bounded() {
        let config = Config {
            precision: MAX_PRECISION + 1,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
