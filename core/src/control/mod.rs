pub mod config;
pub mod controller;
pub mod host;
pub mod retry;

pub use config::{CarrierDefaults, ControllerConfig, PresetAmplitudes, WeatherPresets};
pub use controller::InitializationController;
pub use host::{SignalHandle, SystemHost};
pub use retry::BoundedRetry;
