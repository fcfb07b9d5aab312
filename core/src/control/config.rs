use crate::element_interface::{CarrierSchema, CarrierSettings, WeatherPreset};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Values written by `InitializeDefaults`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierDefaults {
    pub primary: CarrierSettings,
    pub secondary: CarrierSettings,
}

impl Default for CarrierDefaults {
    fn default() -> Self {
        Self {
            primary: CarrierSettings::new(11750.0, 36.0, 30.0),
            secondary: CarrierSettings::new(11790.0, 9.0, 20.0),
        }
    }
}

/// Amplitudes of both carriers for one preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetAmplitudes {
    pub primary_db: f64,
    pub secondary_db: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherPresets {
    pub good_weather: PresetAmplitudes,
    pub bad_weather: PresetAmplitudes,
}

impl Default for WeatherPresets {
    fn default() -> Self {
        Self {
            good_weather: PresetAmplitudes {
                primary_db: 30.0,
                secondary_db: 20.0,
            },
            bad_weather: PresetAmplitudes {
                primary_db: 20.0,
                secondary_db: 10.0,
            },
        }
    }
}

impl WeatherPresets {
    pub fn amplitudes(&self, preset: WeatherPreset) -> PresetAmplitudes {
        match preset {
            WeatherPreset::GoodWeather => self.good_weather,
            WeatherPreset::BadWeather => self.bad_weather,
        }
    }
}

/// Immutable configuration handed to the initialization controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub primary_row: String,
    pub secondary_row: String,
    pub shift_offset_mhz: f64,
    pub settle_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub creation_timeout_ms: u64,
    /// Number of "add default preset" actions issued when rows are missing.
    /// The element adds one row per action.
    pub creation_trigger_count: u32,
    pub defaults: CarrierDefaults,
    pub presets: WeatherPresets,
    pub schema: CarrierSchema,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            primary_row: "Common Satellite spectrum".into(),
            secondary_row: "Common Satellite spectrum_1".into(),
            shift_offset_mhz: 150.0,
            settle_delay_ms: 250,
            poll_interval_ms: 250,
            creation_timeout_ms: 20_000,
            creation_trigger_count: 2,
            defaults: CarrierDefaults::default(),
            presets: WeatherPresets::default(),
            schema: CarrierSchema::default(),
        }
    }
}

impl ControllerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn creation_timeout(&self) -> Duration {
        Duration::from_millis(self.creation_timeout_ms)
    }
}
