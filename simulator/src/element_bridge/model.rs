//! JSON bodies exchanged between the element bridge and its HTTP client.

use carriercore::prelude::{ElementError, ParameterValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysBody {
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowQuery {
    pub row: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueBody {
    pub value: ParameterValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteBody {
    pub row: String,
    pub value: ParameterValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckBody {
    pub status: String,
}

impl AckBody {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ElementError,
}
