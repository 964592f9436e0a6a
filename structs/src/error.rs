use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{quantity} {value} is outside the permitted range [{min}, {max}]")]
    Range {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("no path from {from} to {to}")]
    Unreachable { from: String, to: String },
    #[error("unknown strategy: {0:?}")]
    UnknownStrategy(String),
    #[error("no distance known between {from} and {to}")]
    MissingEdge { from: String, to: String },
    #[error("malformed mission leg: {0:?}")]
    LegFormat(String),
    #[error("no {0} selected")]
    EmptySelection(&'static str),
}

impl Error {
    /// Returns `value` if it lies in `[min, max]`. NaN is always rejected.
    pub fn check_range(quantity: &'static str, value: f64, min: f64, max: f64) -> Result<f64, Error> {
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(Error::Range {
                quantity,
                value,
                min,
                max,
            })
        }
    }
}
