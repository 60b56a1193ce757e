//! Percentage change between adjacent year columns.
//!
//! Every (previous, current) combination is decided by `change_between`; a
//! division only happens once the denominator is known to be non-zero, and a
//! quotient that still overflows is reported as `NotApplicable`.

use super::normalize::Value;
use crate::config::Config;

/// Result for one (previous year, current year) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    /// `((curr - prev) / prev) * 100`, always finite.
    Percent(f64),
    /// Both years are exactly zero.
    Zero,
    /// Previous year is zero and the current one is not.
    NotApplicable,
    /// At least one side has no value.
    NoResult,
}

pub fn change_between(prev: Value, curr: Value) -> Change {
    match (prev, curr) {
        (Value::Number(p), Value::Number(c)) if p == 0.0 => {
            if c == 0.0 {
                Change::Zero
            } else {
                Change::NotApplicable
            }
        }
        (Value::Number(p), Value::Number(c)) => {
            let pct = (c - p) / p * 100.0;
            if pct.is_finite() {
                Change::Percent(pct)
            } else {
                Change::NotApplicable
            }
        }
        (Value::Missing, _) | (_, Value::Missing) => Change::NoResult,
    }
}

/// One entry per value except the first, which has no predecessor.
pub fn compute_changes(values: &[Value]) -> Vec<Change> {
    values
        .windows(2)
        .map(|pair| change_between(pair[0], pair[1]))
        .collect()
}

/// How `Change`s are written out. Shared by every row of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFormat {
    pub precision: usize,
    pub no_result: String,
    pub not_applicable: String,
}

impl Default for ChangeFormat {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ChangeFormat {
    pub fn from_config(config: &Config) -> Self {
        Self {
            precision: config.precision,
            no_result: config.no_result.clone(),
            not_applicable: config.not_applicable.clone(),
        }
    }

    pub fn render(&self, change: Change) -> String {
        match change {
            Change::Percent(pct) => self.fixed(pct),
            Change::Zero => self.fixed(0.0),
            Change::NotApplicable => self.not_applicable.clone(),
            Change::NoResult => self.no_result.clone(),
        }
    }

    fn fixed(&self, n: f64) -> String {
        let s = format!("{:.*}", self.precision, n);
        // -0.0 and tiny negatives round to "-0.00"
        match s.strip_prefix('-') {
            Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
            _ => s,
        }
    }
}
