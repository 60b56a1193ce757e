/// Sentinel the GDP source uses for years without a figure.
pub const NO_DATA: &str = "no data";

/// A year cell after cleanup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Always finite.
    Number(f64),
    Missing,
}

/// Map a raw cell to a `Value`. Total: anything that is not a finite number
/// after trimming (blank, `no data`, `n/a`, `inf`, `NaN`, `1,234`) is missing.
pub fn normalize(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() || s == NO_DATA {
        return Value::Missing;
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Missing,
    }
}
