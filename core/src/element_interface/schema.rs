use crate::prelude::FieldId;
use serde::{Deserialize, Serialize};

/// Columns of the carrier table that the controller touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarrierField {
    CenterFrequency,
    Span,
    Amplitude,
}

impl CarrierField {
    pub const ALL: [CarrierField; 3] = [
        CarrierField::CenterFrequency,
        CarrierField::Span,
        CarrierField::Amplitude,
    ];
}

/// Parameter ids published by the spectrum element's protocol.
///
/// Reads and writes of the same column use different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierSchema {
    pub carrier_table: FieldId,
    pub center_frequency_read: FieldId,
    pub span_read: FieldId,
    pub amplitude_read: FieldId,
    pub center_frequency_write: FieldId,
    pub span_write: FieldId,
    pub amplitude_write: FieldId,
    pub add_default_preset: FieldId,
    /// Action value selecting the "Add Common Satellite Spectrum" preset.
    pub common_satellite_preset: u32,
}

impl Default for CarrierSchema {
    fn default() -> Self {
        Self {
            carrier_table: 300,
            center_frequency_read: 302,
            span_read: 303,
            amplitude_read: 304,
            center_frequency_write: 352,
            span_write: 353,
            amplitude_write: 354,
            add_default_preset: 12,
            common_satellite_preset: 1,
        }
    }
}

impl CarrierSchema {
    pub fn read_id(&self, field: CarrierField) -> FieldId {
        match field {
            CarrierField::CenterFrequency => self.center_frequency_read,
            CarrierField::Span => self.span_read,
            CarrierField::Amplitude => self.amplitude_read,
        }
    }

    pub fn write_id(&self, field: CarrierField) -> FieldId {
        match field {
            CarrierField::CenterFrequency => self.center_frequency_write,
            CarrierField::Span => self.span_write,
            CarrierField::Amplitude => self.amplitude_write,
        }
    }

    pub fn read_field(&self, id: FieldId) -> Option<CarrierField> {
        CarrierField::ALL
            .into_iter()
            .find(|&field| self.read_id(field) == id)
    }

    pub fn write_field(&self, id: FieldId) -> Option<CarrierField> {
        CarrierField::ALL
            .into_iter()
            .find(|&field| self.write_id(field) == id)
    }
}
