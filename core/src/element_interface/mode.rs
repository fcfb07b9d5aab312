use serde::{Deserialize, Serialize};
use std::fmt;

/// Behaviour selected by the `Mode` script parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Initialize,
    GoodWeather,
    BadWeather,
    FrequencyShiftUp,
    FrequencyShiftDown,
    Unknown(String),
}

impl Mode {
    /// Matches the parameter value exactly; anything else is kept as `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "Initialize" => Mode::Initialize,
            "GoodWeather" => Mode::GoodWeather,
            "BadWeather" => Mode::BadWeather,
            "FrequencyShiftUp" => Mode::FrequencyShiftUp,
            "FrequencyShiftDown" => Mode::FrequencyShiftDown,
            other => Mode::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Initialize => f.write_str("Initialize"),
            Mode::GoodWeather => f.write_str("GoodWeather"),
            Mode::BadWeather => f.write_str("BadWeather"),
            Mode::FrequencyShiftUp => f.write_str("FrequencyShiftUp"),
            Mode::FrequencyShiftDown => f.write_str("FrequencyShiftDown"),
            Mode::Unknown(value) => f.write_str(value),
        }
    }
}

/// Amplitude presets applied to both carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherPreset {
    GoodWeather,
    BadWeather,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parse_is_exact() {
        assert_eq!(Mode::parse("BadWeather"), Mode::BadWeather);
        assert_eq!(Mode::parse("badweather"), Mode::Unknown("badweather".into()));
        assert_eq!(Mode::parse("Foo").to_string(), "Foo");
    }
}
