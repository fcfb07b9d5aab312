use crate::element_bridge::model::{AckBody, ErrorBody, KeysBody, RowQuery, ValueBody, WriteBody};
use anyhow::Context;
use carriercore::prelude::{ElementError, ElementResult, FieldId, SpectrumElement};
use carriercore::simulation::SimulatedElement;
use log::{info, warn};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection};

fn status_for(err: &ElementError) -> StatusCode {
    match err {
        ElementError::UnknownTable { .. }
        | ElementError::UnknownParameter { .. }
        | ElementError::UnknownRow { .. } => StatusCode::NOT_FOUND,
        ElementError::InvalidValue { .. } => StatusCode::BAD_REQUEST,
        ElementError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn reply<T: Serialize>(result: ElementResult<T>) -> WithStatus<Json> {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), StatusCode::OK),
        Err(error) => {
            warn!("element request failed: {}", error);
            let status = status_for(&error);
            warp::reply::with_status(warp::reply::json(&ErrorBody { error }), status)
        }
    }
}

/// HTTP routes exposing a simulated element's carrier table.
pub fn routes(
    element: Arc<SimulatedElement>,
) -> impl Filter<Extract = (WithStatus<Json>,), Error = Rejection> + Clone {
    let element_filter = warp::any().map(move || element.clone());

    let keys_route = warp::path!("tables" / FieldId / "keys")
        .and(warp::get())
        .and(element_filter.clone())
        .map(|table: FieldId, element: Arc<SimulatedElement>| {
            reply(element.list_row_keys(table).map(|keys| KeysBody { keys }))
        });

    let read_route = warp::path!("parameters" / FieldId)
        .and(warp::get())
        .and(warp::query::<RowQuery>())
        .and(element_filter.clone())
        .map(
            |field: FieldId, query: RowQuery, element: Arc<SimulatedElement>| {
                reply(
                    element
                        .read_field_by_key(field, &query.row)
                        .map(|value| ValueBody { value }),
                )
            },
        );

    let write_route = warp::path!("parameters" / FieldId)
        .and(warp::put())
        .and(warp::body::json())
        .and(element_filter.clone())
        .map(
            |field: FieldId, body: WriteBody, element: Arc<SimulatedElement>| {
                reply(
                    element
                        .write_field_by_key(field, &body.row, body.value)
                        .map(|()| AckBody::ok()),
                )
            },
        );

    let action_route = warp::path!("actions" / FieldId)
        .and(warp::post())
        .and(warp::body::json())
        .and(element_filter)
        .map(
            |field: FieldId, body: ValueBody, element: Arc<SimulatedElement>| {
                reply(element.trigger_action(field, body.value).map(|()| AckBody::ok()))
            },
        );

    keys_route
        .or(read_route)
        .unify()
        .or(write_route)
        .unify()
        .or(action_route)
        .unify()
}

/// Bridge running on a background runtime; stops when dropped.
pub struct BridgeHandle {
    address: SocketAddr,
    _runtime: Runtime,
}

impl BridgeHandle {
    /// Starts serving `element` on `address`; port 0 picks a free port.
    pub fn spawn(element: Arc<SimulatedElement>, address: SocketAddr) -> anyhow::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("creating runtime for element bridge")?;
        let (bound, server) = runtime
            .block_on(async move { warp::serve(routes(element)).try_bind_ephemeral(address) })
            .with_context(|| format!("binding element bridge to {}", address))?;
        runtime.spawn(server);
        info!("element bridge listening on http://{}", bound);
        Ok(Self {
            address: bound,
            _runtime: runtime,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carriercore::element_interface::CarrierSchema;
    use serde_json::{json, Value};

    fn element() -> Arc<SimulatedElement> {
        Arc::new(SimulatedElement::new(CarrierSchema::default()))
    }

    fn body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn preset_action_adds_listed_rows() {
        let filter = routes(element());

        let response = warp::test::request()
            .method("POST")
            .path("/actions/12")
            .json(&json!({ "value": 1 }))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/tables/300/keys")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), json!({ "keys": ["Common Satellite spectrum"] }));
    }

    #[tokio::test]
    async fn parameters_are_written_and_read_by_row_key() {
        let element = element();
        element
            .trigger_action(12, carriercore::prelude::ParameterValue::from(1u32))
            .unwrap();
        let filter = routes(element.clone());

        let response = warp::test::request()
            .method("PUT")
            .path("/parameters/354")
            .json(&json!({ "row": "Common Satellite spectrum", "value": 12.5 }))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/parameters/304?row=Common%20Satellite%20spectrum")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), json!({ "value": 12.5 }));
    }

    #[tokio::test]
    async fn row_keys_travel_in_query_and_body_not_path() {
        let element = element();
        element
            .trigger_action(12, carriercore::prelude::ParameterValue::from(1u32))
            .unwrap();
        let filter = routes(element.clone());

        let response = warp::test::request()
            .method("GET")
            .path("/parameters/302/Common%20Satellite%20spectrum")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = warp::test::request()
            .method("PUT")
            .path("/parameters/354/Common%20Satellite%20spectrum")
            .json(&json!({ "value": 3.0 }))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let untouched = element.row("Common Satellite spectrum").unwrap().unwrap();
        assert_eq!(untouched.settings.amplitude_db, 25.0);

        let response = warp::test::request()
            .method("PUT")
            .path("/parameters/352")
            .json(&json!({ "row": "Common Satellite spectrum", "value": 11900 }))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), json!({ "status": "ok" }));

        let response = warp::test::request()
            .method("GET")
            .path("/parameters/302?row=Common+Satellite+spectrum")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), json!({ "value": 11900.0 }));
    }

    #[tokio::test]
    async fn element_errors_map_to_status_codes() {
        let filter = routes(element());

        let response = warp::test::request()
            .method("GET")
            .path("/parameters/302?row=missing")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(&response)["error"]["kind"], "unknown_row");

        let response = warp::test::request()
            .method("POST")
            .path("/actions/12")
            .json(&json!({ "value": "two" }))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response)["error"]["kind"], "invalid_value");

        let response = warp::test::request()
            .method("GET")
            .path("/tables/999/keys")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
