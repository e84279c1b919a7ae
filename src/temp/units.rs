use serde::{Deserialize, Serialize};

const KELVIN_OFFSET: f64 = 273.15;

/// Temperature scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TempUnits {
    Kelvin,
    Fahrenheit,
    Celsius,
}

impl TempUnits {
    /// Single-character code used when formatting temperatures.
    pub fn short_code(self) -> &'static str {
        match self {
            Self::Kelvin => "K",
            Self::Fahrenheit => "F",
            Self::Celsius => "C",
        }
    }

    /// Converts `value` expressed in `from` into these units, pivoting through Kelvin.
    pub fn convert(self, value: f64, from: TempUnits) -> f64 {
        if self == from {
            value
        } else {
            self.from_kelvin(from.to_kelvin(value))
        }
    }

    /// Converts a temperature difference, applying the scale factor but no offset.
    pub fn convert_interval(self, delta: f64, from: TempUnits) -> f64 {
        delta * self.degree_size_in_kelvin().recip() * from.degree_size_in_kelvin()
    }

    fn degree_size_in_kelvin(self) -> f64 {
        match self {
            Self::Kelvin | Self::Celsius => 1.0,
            Self::Fahrenheit => 5.0 / 9.0,
        }
    }

    fn to_kelvin(self, value: f64) -> f64 {
        match self {
            Self::Kelvin => value,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
            Self::Celsius => value + KELVIN_OFFSET,
        }
    }

    fn from_kelvin(self, kelvin: f64) -> f64 {
        match self {
            Self::Kelvin => kelvin,
            Self::Fahrenheit => (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
            Self::Celsius => kelvin - KELVIN_OFFSET,
        }
    }
}

impl std::fmt::Display for TempUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_code())
    }
}
