use crate::element_bridge::model::{AckBody, ErrorBody, KeysBody, RowQuery, ValueBody, WriteBody};
use anyhow::Context;
use carriercore::prelude::{
    ElementError, ElementResult, FieldId, ParameterValue, SpectrumElement,
};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn unavailable(err: reqwest::Error) -> ElementError {
    ElementError::Unavailable {
        reason: err.to_string(),
    }
}

/// Spectrum element reached through an element bridge over HTTP.
///
/// Row keys are fetched on every call, never cached, so polling sees rows
/// as soon as the element creates them.
pub struct HttpElement {
    base_url: String,
    client: Client,
}

impl HttpElement {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building element HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> ElementResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().map_err(unavailable);
        }
        match response.json::<ErrorBody>() {
            Ok(body) => Err(body.error),
            Err(_) => Err(ElementError::Unavailable {
                reason: format!("element bridge responded with {}", status),
            }),
        }
    }
}

impl SpectrumElement for HttpElement {
    fn read_field_by_key(&self, field: FieldId, key: &str) -> ElementResult<ParameterValue> {
        let response = self
            .client
            .get(self.url(&format!("parameters/{}", field)))
            .query(&RowQuery {
                row: key.to_string(),
            })
            .send()
            .map_err(unavailable)?;
        Self::decode::<ValueBody>(response).map(|body| body.value)
    }

    fn write_field_by_key(
        &self,
        field: FieldId,
        key: &str,
        value: ParameterValue,
    ) -> ElementResult<()> {
        let response = self
            .client
            .put(self.url(&format!("parameters/{}", field)))
            .json(&WriteBody {
                row: key.to_string(),
                value,
            })
            .send()
            .map_err(unavailable)?;
        Self::decode::<AckBody>(response).map(|_| ())
    }

    fn trigger_action(&self, field: FieldId, value: ParameterValue) -> ElementResult<()> {
        let response = self
            .client
            .post(self.url(&format!("actions/{}", field)))
            .json(&ValueBody { value })
            .send()
            .map_err(unavailable)?;
        Self::decode::<AckBody>(response).map(|_| ())
    }

    fn list_row_keys(&self, table: FieldId) -> ElementResult<Vec<String>> {
        let response = self
            .client
            .get(self.url(&format!("tables/{}/keys", table)))
            .send()
            .map_err(unavailable)?;
        Self::decode::<KeysBody>(response).map(|body| body.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_bridge::bridge::BridgeHandle;
    use crate::workflow::runner::{RunOutcome, Runner, ScriptParams};
    use carriercore::control::SystemHost;
    use carriercore::element_interface::{read_carrier_table, CarrierSchema, CarrierSettings};
    use carriercore::simulation::SimulatedElement;
    use carriercore::telemetry::LogManager;
    use carriercore::ControllerConfig;
    use std::net::SocketAddr;
    use std::sync::Arc;

    fn local_bridge(element: Arc<SimulatedElement>) -> BridgeHandle {
        BridgeHandle::spawn(element, SocketAddr::from(([127, 0, 0, 1], 0))).unwrap()
    }

    #[test]
    fn remote_runs_keep_rows_between_invocations() {
        let element = Arc::new(
            SimulatedElement::new(CarrierSchema::default())
                .with_creation_latency(Duration::from_millis(30)),
        );
        let bridge = local_bridge(element.clone());
        let remote = HttpElement::new(format!("{}/", bridge.base_url())).unwrap();
        let runner = Runner::new(ControllerConfig {
            settle_delay_ms: 10,
            poll_interval_ms: 10,
            creation_timeout_ms: 5_000,
            ..ControllerConfig::default()
        });
        let host = SystemHost::new(LogManager::new("remote-test"));

        let first = runner
            .execute(
                &remote,
                &host,
                &ScriptParams {
                    mode: "Initialize".into(),
                    index_reference: String::new(),
                },
            )
            .unwrap();
        assert_eq!(first.outcome, RunOutcome::Completed);
        assert_eq!(first.metrics.actions, 2);

        let second = runner
            .execute(
                &remote,
                &host,
                &ScriptParams {
                    mode: "FrequencyShiftDown".into(),
                    index_reference: "Common Satellite spectrum_1".into(),
                },
            )
            .unwrap();
        assert_eq!(second.outcome, RunOutcome::Completed);
        assert_eq!(second.metrics.actions, 0);

        let rows = read_carrier_table(&remote, &CarrierSchema::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].settings, CarrierSettings::new(11640.0, 9.0, 20.0));
        assert_eq!(element.rows().unwrap(), rows);
    }

    #[test]
    fn bridge_errors_come_back_as_element_errors() {
        let bridge = local_bridge(Arc::new(SimulatedElement::new(CarrierSchema::default())));
        let remote = HttpElement::new(bridge.base_url()).unwrap();

        assert_eq!(
            remote.read_field_by_key(302, "nowhere"),
            Err(ElementError::UnknownRow {
                field: 302,
                key: "nowhere".into(),
            })
        );
        assert_eq!(
            remote.list_row_keys(42),
            Err(ElementError::UnknownTable { table: 42 })
        );
    }

    #[test]
    fn unreachable_bridge_is_unavailable() {
        let remote = HttpElement::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            remote.list_row_keys(300),
            Err(ElementError::Unavailable { .. })
        ));
    }
}
