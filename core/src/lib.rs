//! Default carrier initialization for spectrum analysis elements.
//!
//! The controller makes sure the two default carrier rows exist on an element,
//! creating them through the element's preset action and polling with a
//! bounded retry, then writes defaults, weather presets or frequency shifts.

pub mod control;
pub mod element_interface;
pub mod prelude;
pub mod simulation;
pub mod telemetry;

pub use control::{ControllerConfig, InitializationController};
pub use prelude::{ControllerError, Host, HostSignal, SpectrumElement};
