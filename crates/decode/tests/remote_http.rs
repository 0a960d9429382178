use std::time::Duration;

use httpmock::prelude::*;
use vincheck_core::{decode_structural, DataSource, FieldValue, Vin};
use vincheck_decode::{resolve, RemoteResolver, ResolverError, RetryPolicy, VinLookup};

const VIN: &str = "1HGCV1F34KA123456";
const DECODE_PATH: &str = "/api/vehicles/DecodeVIN/1HGCV1F34KA123456";

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_millis(200),
        max_retries: 2,
        retry_delay: Duration::from_millis(10),
    }
}

fn resolver(server: &MockServer) -> RemoteResolver {
    RemoteResolver::with_base_url(&server.base_url(), fast_policy()).unwrap()
}

fn vin() -> Vin {
    Vin::parse(VIN).unwrap()
}

fn honda_body() -> serde_json::Value {
    serde_json::json!({
        "Count": 6,
        "Message": "Results returned successfully",
        "Results": [
            {"Variable": "Make", "Value": "HONDA", "VariableId": 26},
            {"Variable": "Model Year", "Value": "2019", "VariableId": 29},
            {"Variable": "Model", "Value": "Accord", "VariableId": 28},
            {"Variable": "Displacement (L)", "Value": "1.5", "VariableId": 13},
            {"Variable": "Fuel Type - Primary", "Value": "Gasoline", "VariableId": 24},
            {"Variable": "Transmission Style", "Value": "Continuously Variable Transmission (CVT)", "VariableId": 37}
        ]
    })
}

#[test]
fn success_returns_variables() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(DECODE_PATH).query_param("format", "json");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(honda_body());
    });

    let raw = resolver(&server).fetch_raw(&vin()).unwrap();

    mock.assert();
    assert_eq!(raw.variables.len(), 6);
    assert_eq!(raw.value("Make"), Some("HONDA"));
}

#[test]
fn http_error_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(DECODE_PATH);
        then.status(500).body("internal error");
    });

    let err = resolver(&server).fetch_raw(&vin()).unwrap_err();

    mock.assert_calls(1);
    assert_eq!(
        err,
        ResolverError::Http {
            status: 500,
            message: "internal error".into(),
        }
    );
}

#[test]
fn empty_results_are_terminal() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(DECODE_PATH);
        then.status(200)
            .json_body(serde_json::json!({"Count": 0, "Results": []}));
    });

    let err = resolver(&server).fetch_raw(&vin()).unwrap_err();

    mock.assert_calls(1);
    assert_eq!(err, ResolverError::Empty);
}

#[test]
fn timeout_retried_until_budget_spent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(DECODE_PATH);
        then.status(200)
            .delay(Duration::from_millis(800))
            .json_body(honda_body());
    });

    let err = resolver(&server).fetch_raw(&vin()).unwrap_err();

    mock.assert_calls(3);
    assert_eq!(err, ResolverError::Timeout { attempts: 3 });
}

#[test]
fn resolve_end_to_end() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(DECODE_PATH);
        then.status(200).json_body(honda_body());
    });

    let res = resolve(VIN, &resolver(&server));

    assert!(res.success);
    let record = res.record.unwrap();
    assert_eq!(record.manufacturer, FieldValue::Resolved("Honda".into()));
    assert_eq!(record.model, FieldValue::Resolved("Accord".into()));
    assert_eq!(record.engine.to_string(), "Displacement: 1.5L; Fuel Type: Gasoline");
    assert_eq!(record.transmission.to_string(), "CVT");
    assert_eq!(record.data_source, DataSource::Remote);
}

#[test]
fn exhausted_timeouts_fall_back_to_structural() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(DECODE_PATH);
        then.status(200)
            .delay(Duration::from_millis(800))
            .json_body(honda_body());
    });

    let res = resolve(VIN, &resolver(&server));

    let record = res.record.unwrap();
    let structural = decode_structural(&vin());
    assert_eq!(record.data_source, DataSource::StructuralOnly);
    assert_eq!(record.manufacturer, structural.manufacturer);
    assert_eq!(record.year, structural.year);
    assert!(res.success);
    assert!(res.error.unwrap().contains("timed out"));
}
