//! Year-over-year percentage change for wide-format GDP tables.
//!
//! The input is one row per country and one column per year; the output
//! holds, per country, the change of each year against the column before it.
pub mod change;
pub mod config;
pub mod discover;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod table;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{run, RunSummary};
