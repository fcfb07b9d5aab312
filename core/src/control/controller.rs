use crate::control::config::ControllerConfig;
use crate::control::retry::BoundedRetry;
use crate::element_interface::{CarrierField, CarrierSettings, Mode, WeatherPreset};
use crate::prelude::{
    ControllerError, ControllerResult, ElementError, FieldId, Host, ParameterValue,
    SpectrumElement,
};
use crate::telemetry::metrics::MetricsRecorder;
use log::{debug, error};

/// Ensures the two default carrier rows exist on an element and writes their
/// settings, presets and frequency shifts.
///
/// Every element access is preceded by a host checkpoint so that a pending
/// host signal ends the run before the next read or write.
pub struct InitializationController<'a> {
    element: &'a dyn SpectrumElement,
    host: &'a dyn Host,
    config: ControllerConfig,
    metrics: MetricsRecorder,
}

impl<'a> InitializationController<'a> {
    pub fn new(
        element: &'a dyn SpectrumElement,
        host: &'a dyn Host,
        config: ControllerConfig,
    ) -> Self {
        Self {
            element,
            host,
            config,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Runs the operation selected by `mode`. Unknown modes are reported to
    /// the host and leave the element untouched.
    pub fn dispatch(&self, mode: &Mode, index_reference: &str) -> ControllerResult<()> {
        debug!("dispatching mode {}", mode);
        let offset = self.config.shift_offset_mhz;
        match mode {
            Mode::Initialize => self.initialize_defaults(),
            Mode::GoodWeather => self.apply_preset(WeatherPreset::GoodWeather),
            Mode::BadWeather => self.apply_preset(WeatherPreset::BadWeather),
            Mode::FrequencyShiftUp => self.shift_frequency(index_reference, offset),
            Mode::FrequencyShiftDown => self.shift_frequency(index_reference, -offset),
            Mode::Unknown(value) => {
                self.host
                    .generate_information(&format!("Unknown mode: {}", value));
                Ok(())
            }
        }
    }

    /// True when both configured rows are listed in the carrier table.
    pub fn rows_exist(&self) -> ControllerResult<bool> {
        let keys = self.list_row_keys()?;
        self.host
            .generate_information(&format!("found keys: {}", keys.join(", ")));
        let has = |wanted: &str| keys.iter().any(|key| key == wanted);
        Ok(has(&self.config.primary_row) && has(&self.config.secondary_row))
    }

    pub fn initialize_defaults(&self) -> ControllerResult<()> {
        if !self.rows_exist()? {
            self.create_rows()?;
        }

        let defaults = self.config.defaults;
        self.write_settings(&self.config.primary_row, &defaults.primary)?;
        self.write_settings(&self.config.secondary_row, &defaults.secondary)
    }

    /// Writes the preset amplitudes; frequency and span are left alone.
    pub fn apply_preset(&self, preset: WeatherPreset) -> ControllerResult<()> {
        self.ensure_rows()?;

        let amplitudes = self.config.presets.amplitudes(preset);
        self.write_field(
            CarrierField::Amplitude,
            &self.config.primary_row,
            amplitudes.primary_db,
        )?;
        self.write_field(
            CarrierField::Amplitude,
            &self.config.secondary_row,
            amplitudes.secondary_db,
        )
    }

    /// Moves the center frequency of `row` by `delta_mhz`.
    ///
    /// `row` is passed to the element as-is; an unknown key is reported by
    /// the element.
    pub fn shift_frequency(&self, row: &str, delta_mhz: f64) -> ControllerResult<()> {
        self.ensure_rows()?;

        let field = self.config.schema.center_frequency_read;
        let value = self.read_field(field, row)?;
        let current = value
            .as_f64()
            .ok_or_else(|| ControllerError::UnparsableValue {
                field,
                key: row.to_string(),
                value: value.to_string(),
            })?;
        self.write_field(CarrierField::CenterFrequency, row, current + delta_mhz)
    }

    fn ensure_rows(&self) -> ControllerResult<()> {
        if !self.rows_exist()? {
            self.initialize_defaults()?;
        }
        Ok(())
    }

    fn create_rows(&self) -> ControllerResult<()> {
        let schema = self.config.schema;
        for _ in 0..self.config.creation_trigger_count {
            self.trigger_action(
                schema.add_default_preset,
                ParameterValue::from(schema.common_satellite_preset),
            )?;
        }
        self.host.sleep(self.config.settle_delay())?;

        let retry = BoundedRetry::new(self.config.poll_interval(), self.config.creation_timeout());
        if retry.run(self.host, || self.rows_exist())? {
            Ok(())
        } else {
            error!(
                "rows '{}' and '{}' missing after {:?}",
                self.config.primary_row,
                self.config.secondary_row,
                self.config.creation_timeout()
            );
            Err(ControllerError::RowsNotCreated)
        }
    }

    fn write_settings(&self, row: &str, settings: &CarrierSettings) -> ControllerResult<()> {
        for field in [
            CarrierField::CenterFrequency,
            CarrierField::Span,
            CarrierField::Amplitude,
        ] {
            self.write_field(field, row, settings.get(field))?;
        }
        Ok(())
    }

    fn list_row_keys(&self) -> ControllerResult<Vec<String>> {
        self.host.checkpoint()?;
        let keys = self
            .element
            .list_row_keys(self.config.schema.carrier_table)
            .map_err(|err| self.element_failure(err))?;
        self.metrics.record_read();
        Ok(keys)
    }

    fn read_field(&self, field: FieldId, row: &str) -> ControllerResult<ParameterValue> {
        self.host.checkpoint()?;
        let value = self
            .element
            .read_field_by_key(field, row)
            .map_err(|err| self.element_failure(err))?;
        self.metrics.record_read();
        Ok(value)
    }

    fn write_field(&self, field: CarrierField, row: &str, value: f64) -> ControllerResult<()> {
        self.host.checkpoint()?;
        let id = self.config.schema.write_id(field);
        debug!("writing {} to parameter {} of '{}'", value, id, row);
        self.element
            .write_field_by_key(id, row, ParameterValue::from(value))
            .map_err(|err| self.element_failure(err))?;
        self.metrics.record_write();
        Ok(())
    }

    fn trigger_action(&self, field: FieldId, value: ParameterValue) -> ControllerResult<()> {
        self.host.checkpoint()?;
        self.element
            .trigger_action(field, value)
            .map_err(|err| self.element_failure(err))?;
        self.metrics.record_action();
        Ok(())
    }

    fn element_failure(&self, err: ElementError) -> ControllerError {
        self.metrics.record_error();
        ControllerError::Element(err)
    }
}
