use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Numeric identifier of an element parameter, table or action.
pub type FieldId = u32;

/// Value exchanged with a spectrum element.
///
/// Elements are free to answer reads with text; callers that need a number go
/// through [`ParameterValue::as_f64`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}

impl ParameterValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(value) => Some(*value),
            ParameterValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        ParameterValue::Number(f64::from(value))
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Number(value) => write!(f, "{}", value),
            ParameterValue::Text(text) => f.write_str(text),
        }
    }
}

/// Termination requests raised by the host running the controller.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    #[error("script aborted")]
    Abort,
    #[error("script force-aborted")]
    ForceAbort,
    #[error("script timed out")]
    Timeout,
    #[error("interactive user detached")]
    UserDetached,
}

/// Failures reported by a spectrum element.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementError {
    #[error("unknown table {table}")]
    UnknownTable { table: FieldId },
    #[error("unknown parameter {field}")]
    UnknownParameter { field: FieldId },
    #[error("row '{key}' not found for parameter {field}")]
    UnknownRow { field: FieldId, key: String },
    #[error("invalid value '{value}' for parameter {field}")]
    InvalidValue { field: FieldId, value: String },
    #[error("element unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type ElementResult<T> = Result<T, ElementError>;

/// Common error type for controller operations.
#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("InitializeDefaults failed. Expected keys are not created.")]
    RowsNotCreated,
    #[error("value '{value}' of parameter {field} on row '{key}' is not numeric")]
    UnparsableValue {
        field: FieldId,
        key: String,
        value: String,
    },
    #[error(transparent)]
    Element(#[from] ElementError),
    #[error(transparent)]
    HostSignal(#[from] HostSignal),
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Remote managed element holding the carrier table.
pub trait SpectrumElement {
    fn read_field_by_key(&self, field: FieldId, key: &str) -> ElementResult<ParameterValue>;
    fn write_field_by_key(
        &self,
        field: FieldId,
        key: &str,
        value: ParameterValue,
    ) -> ElementResult<()>;
    fn trigger_action(&self, field: FieldId, value: ParameterValue) -> ElementResult<()>;
    fn list_row_keys(&self, table: FieldId) -> ElementResult<Vec<String>>;
}

/// Environment the controller runs in.
///
/// `checkpoint` and `sleep` return the pending [`HostSignal`] as soon as the
/// host asks the run to stop.
pub trait Host {
    fn generate_information(&self, message: &str);
    fn checkpoint(&self) -> Result<(), HostSignal>;
    fn sleep(&self, duration: Duration) -> Result<(), HostSignal>;
    fn now(&self) -> Instant;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_values_parse_as_numbers() {
        assert_eq!(ParameterValue::from(" 11750 ").as_f64(), Some(11750.0));
        assert_eq!(ParameterValue::from("n/a").as_f64(), None);
        assert_eq!(ParameterValue::from(36.5).as_f64(), Some(36.5));
    }

    #[test]
    fn parameter_values_deserialize_untagged() {
        let number: ParameterValue = serde_json::from_str("11790").unwrap();
        let text: ParameterValue = serde_json::from_str("\"11790\"").unwrap();
        assert_eq!(number, ParameterValue::Number(11790.0));
        assert_eq!(text, ParameterValue::Text("11790".into()));
    }

    #[test]
    fn element_errors_carry_their_kind_over_json() {
        let error = ElementError::UnknownRow {
            field: 302,
            key: "missing".into(),
        };
        let encoded = serde_json::to_string(&error).unwrap();
        assert!(encoded.contains("\"kind\":\"unknown_row\""));
        let decoded: ElementError = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, error);
    }
}
