use crate::element_interface::{CarrierRow, CarrierSchema, CarrierSettings};
use crate::prelude::{ElementError, ElementResult, FieldId, ParameterValue, SpectrumElement};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// In-memory spectrum element with a carrier table.
///
/// Every "add default preset" action appends one row named after the preset,
/// suffixed `_1`, `_2`, ... when the name is already taken. Rows can be made to
/// appear only after a creation latency.
pub struct SimulatedElement {
    schema: CarrierSchema,
    preset_name: String,
    preset_settings: CarrierSettings,
    creation_latency: Duration,
    creates_rows: bool,
    table: Mutex<CarrierTable>,
}

#[derive(Default)]
struct CarrierTable {
    rows: Vec<CarrierRow>,
    pending: Vec<(Instant, CarrierRow)>,
}

impl CarrierTable {
    fn promote_ready(&mut self) {
        let now = Instant::now();
        let (ready, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|(ready_at, _)| *ready_at <= now);
        self.pending = waiting;
        self.rows.extend(ready.into_iter().map(|(_, row)| row));
    }

    fn is_taken(&self, key: &str) -> bool {
        self.rows.iter().any(|row| row.key == key)
            || self.pending.iter().any(|(_, row)| row.key == key)
    }

    fn row_mut(&mut self, key: &str) -> Option<&mut CarrierRow> {
        self.rows.iter_mut().find(|row| row.key == key)
    }
}

impl SimulatedElement {
    pub fn new(schema: CarrierSchema) -> Self {
        Self {
            schema,
            preset_name: "Common Satellite spectrum".into(),
            preset_settings: CarrierSettings::new(11700.0, 36.0, 25.0),
            creation_latency: Duration::ZERO,
            creates_rows: true,
            table: Mutex::new(CarrierTable::default()),
        }
    }

    pub fn with_preset_name(mut self, name: impl Into<String>) -> Self {
        self.preset_name = name.into();
        self
    }

    pub fn with_creation_latency(mut self, latency: Duration) -> Self {
        self.creation_latency = latency;
        self
    }

    /// Accepts preset actions without ever adding rows.
    pub fn without_row_creation(mut self) -> Self {
        self.creates_rows = false;
        self
    }

    pub fn with_rows(self, rows: Vec<CarrierRow>) -> Self {
        if let Ok(mut table) = self.table.lock() {
            table.rows = rows;
        }
        self
    }

    /// Snapshot of the rows that currently exist.
    pub fn rows(&self) -> ElementResult<Vec<CarrierRow>> {
        Ok(self.table()?.rows.clone())
    }

    pub fn row(&self, key: &str) -> ElementResult<Option<CarrierRow>> {
        Ok(self.table()?.rows.iter().find(|row| row.key == key).cloned())
    }

    fn table(&self) -> ElementResult<MutexGuard<'_, CarrierTable>> {
        let mut table = self.table.lock().map_err(|_| ElementError::Unavailable {
            reason: "carrier table lock poisoned".into(),
        })?;
        table.promote_ready();
        Ok(table)
    }

    fn add_preset_row(&self) -> ElementResult<()> {
        let mut table = self.table()?;
        let mut key = self.preset_name.clone();
        let mut suffix = 0;
        while table.is_taken(&key) {
            suffix += 1;
            key = format!("{}_{}", self.preset_name, suffix);
        }
        let row = CarrierRow::new(key, self.preset_settings);
        if self.creation_latency.is_zero() {
            table.rows.push(row);
        } else {
            table
                .pending
                .push((Instant::now() + self.creation_latency, row));
        }
        Ok(())
    }
}

impl SpectrumElement for SimulatedElement {
    fn read_field_by_key(&self, field: FieldId, key: &str) -> ElementResult<ParameterValue> {
        let column = self
            .schema
            .read_field(field)
            .ok_or(ElementError::UnknownParameter { field })?;
        let table = self.table()?;
        let row = table
            .rows
            .iter()
            .find(|row| row.key == key)
            .ok_or_else(|| ElementError::UnknownRow {
                field,
                key: key.to_string(),
            })?;
        Ok(ParameterValue::Number(row.settings.get(column)))
    }

    fn write_field_by_key(
        &self,
        field: FieldId,
        key: &str,
        value: ParameterValue,
    ) -> ElementResult<()> {
        let column = self
            .schema
            .write_field(field)
            .ok_or(ElementError::UnknownParameter { field })?;
        let number = value.as_f64().ok_or_else(|| ElementError::InvalidValue {
            field,
            value: value.to_string(),
        })?;
        let mut table = self.table()?;
        let row = table.row_mut(key).ok_or_else(|| ElementError::UnknownRow {
            field,
            key: key.to_string(),
        })?;
        row.settings.set(column, number);
        Ok(())
    }

    fn trigger_action(&self, field: FieldId, value: ParameterValue) -> ElementResult<()> {
        if field != self.schema.add_default_preset {
            return Err(ElementError::UnknownParameter { field });
        }
        if value.as_f64() != Some(f64::from(self.schema.common_satellite_preset)) {
            return Err(ElementError::InvalidValue {
                field,
                value: value.to_string(),
            });
        }
        if self.creates_rows {
            self.add_preset_row()?;
        }
        Ok(())
    }

    fn list_row_keys(&self, table: FieldId) -> ElementResult<Vec<String>> {
        if table != self.schema.carrier_table {
            return Err(ElementError::UnknownTable { table });
        }
        Ok(self.table()?.rows.iter().map(|row| row.key.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_interface::read_carrier_table;

    fn element() -> SimulatedElement {
        SimulatedElement::new(CarrierSchema::default())
    }

    #[test]
    fn repeated_preset_actions_suffix_row_names() {
        let element = element();
        for _ in 0..3 {
            element.trigger_action(12, ParameterValue::from(1u32)).unwrap();
        }
        assert_eq!(
            element.list_row_keys(300).unwrap(),
            vec![
                "Common Satellite spectrum",
                "Common Satellite spectrum_1",
                "Common Satellite spectrum_2",
            ]
        );
    }

    #[test]
    fn rows_appear_after_creation_latency() {
        let element = element().with_creation_latency(Duration::from_millis(40));
        element.trigger_action(12, ParameterValue::from(1u32)).unwrap();
        assert!(element.list_row_keys(300).unwrap().is_empty());
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(element.list_row_keys(300).unwrap().len(), 1);
    }

    #[test]
    fn writes_go_through_write_ids_and_reads_through_read_ids() {
        let element = element();
        element.trigger_action(12, ParameterValue::from(1u32)).unwrap();
        element
            .write_field_by_key(352, "Common Satellite spectrum", ParameterValue::from("11800"))
            .unwrap();
        assert_eq!(
            element
                .read_field_by_key(302, "Common Satellite spectrum")
                .unwrap(),
            ParameterValue::Number(11800.0)
        );
        assert_eq!(
            element.read_field_by_key(352, "Common Satellite spectrum"),
            Err(ElementError::UnknownParameter { field: 352 })
        );
    }

    #[test]
    fn unknown_tables_rows_and_actions_are_rejected() {
        let element = element();
        assert_eq!(
            element.list_row_keys(301),
            Err(ElementError::UnknownTable { table: 301 })
        );
        assert!(matches!(
            element.write_field_by_key(354, "missing", ParameterValue::from(1.0)),
            Err(ElementError::UnknownRow { .. })
        ));
        assert!(matches!(
            element.trigger_action(12, ParameterValue::from(7u32)),
            Err(ElementError::InvalidValue { .. })
        ));
        assert_eq!(
            element.trigger_action(13, ParameterValue::from(1u32)),
            Err(ElementError::UnknownParameter { field: 13 })
        );
    }

    #[test]
    fn carrier_table_is_read_through_the_trait() {
        let element = element().with_rows(vec![CarrierRow::new(
            "manual",
            CarrierSettings::new(12000.0, 10.0, 5.0),
        )]);
        let rows = read_carrier_table(&element, &CarrierSchema::default()).unwrap();
        assert_eq!(rows, element.rows().unwrap());
    }
}
