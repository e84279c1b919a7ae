//! Core error taxonomy and bounded scalar types shared across the crate.

pub mod types;

pub use types::*;

/// Errors surfaced by temperature analytics, fitting and simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// A value outside its domain (non-finite temperature, fraction outside `[0, 1]`, ...).
    InvalidValue(String),
    /// Element-wise arithmetic between keyed containers whose keys differ.
    KeyMismatch(String),
    /// An operation that needs at least one observation received none.
    EmptyInput(String),
    /// A model parameter outside its admissible range.
    InvalidParameter(String),
    /// Scalar division by zero.
    DivideByZero,
    /// Numerical failure (singular system, overflow, ...).
    Numerical(String),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
            Self::KeyMismatch(msg) => write!(f, "key mismatch: {msg}"),
            Self::EmptyInput(msg) => write!(f, "empty input: {msg}"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::DivideByZero => write!(f, "divide by zero"),
            Self::Numerical(msg) => write!(f, "numerical error: {msg}"),
        }
    }
}

impl std::error::Error for WeatherError {}
