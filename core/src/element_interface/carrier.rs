use crate::element_interface::schema::{CarrierField, CarrierSchema};
use crate::prelude::{ElementError, ElementResult, SpectrumElement};
use serde::{Deserialize, Serialize};

/// Scalar settings of one carrier row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierSettings {
    pub center_frequency_mhz: f64,
    pub span_mhz: f64,
    pub amplitude_db: f64,
}

impl CarrierSettings {
    pub fn new(center_frequency_mhz: f64, span_mhz: f64, amplitude_db: f64) -> Self {
        Self {
            center_frequency_mhz,
            span_mhz,
            amplitude_db,
        }
    }

    pub fn get(&self, field: CarrierField) -> f64 {
        match field {
            CarrierField::CenterFrequency => self.center_frequency_mhz,
            CarrierField::Span => self.span_mhz,
            CarrierField::Amplitude => self.amplitude_db,
        }
    }

    pub fn set(&mut self, field: CarrierField, value: f64) {
        match field {
            CarrierField::CenterFrequency => self.center_frequency_mhz = value,
            CarrierField::Span => self.span_mhz = value,
            CarrierField::Amplitude => self.amplitude_db = value,
        }
    }
}

/// A row of the carrier table, addressed by its primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierRow {
    pub key: String,
    pub settings: CarrierSettings,
}

impl CarrierRow {
    pub fn new(key: impl Into<String>, settings: CarrierSettings) -> Self {
        Self {
            key: key.into(),
            settings,
        }
    }
}

/// Reads every row of the carrier table through the element's read ids.
pub fn read_carrier_table(
    element: &dyn SpectrumElement,
    schema: &CarrierSchema,
) -> ElementResult<Vec<CarrierRow>> {
    let mut rows = Vec::new();
    for key in element.list_row_keys(schema.carrier_table)? {
        let mut settings = CarrierSettings::new(0.0, 0.0, 0.0);
        for field in CarrierField::ALL {
            let id = schema.read_id(field);
            let value = element.read_field_by_key(id, &key)?;
            let number = value.as_f64().ok_or_else(|| ElementError::InvalidValue {
                field: id,
                value: value.to_string(),
            })?;
            settings.set(field, number);
        }
        rows.push(CarrierRow::new(key, settings));
    }
    Ok(rows)
}
