pub mod carrier;
pub mod mode;
pub mod schema;

pub use carrier::{read_carrier_table, CarrierRow, CarrierSettings};
pub use mode::{Mode, WeatherPreset};
pub use schema::{CarrierField, CarrierSchema};
