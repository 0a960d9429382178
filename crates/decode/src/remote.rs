//! Remote decode service client.
//!
//! Blocking reqwest client (no Tokio runtime required). One GET per attempt
//! against `{base_url}/api/vehicles/DecodeVIN/{vin}?format=json`; the response
//! is a JSON object whose `Results` array holds `{Variable, Value}` pairs.

use std::thread;
use std::time::Duration;

use serde::Serialize;
use vincheck_core::{FieldValue, Vin};

use crate::error::ResolverError;

// ── Constants ───────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://vpic.nhtsa.dot.gov";
const USER_AGENT: &str = concat!("vincheck/", env!("CARGO_PKG_VERSION"));
const ERROR_BODY_LIMIT: usize = 200;

// ── Retry policy ────────────────────────────────────────────────────

/// Per-attempt timeout plus a fixed retry budget with a fixed delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_retries: 2,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

// ── Raw record ──────────────────────────────────────────────────────

/// One `(Variable, Value)` pair exactly as the service sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteVariable {
    #[serde(rename = "Variable")]
    pub variable: String,
    #[serde(rename = "Value")]
    pub value: Option<String>,
}

/// Ordered variable list from one lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRemoteRecord {
    pub variables: Vec<RemoteVariable>,
}

impl RawRemoteRecord {
    /// First non-blank value reported for `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .filter(|v| v.variable == name)
            .filter_map(|v| v.value.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    fn field(&self, name: &str) -> FieldValue {
        FieldValue::from_raw(self.value(name))
    }
}

/// The variables this system cares about, blank/null mapped to `NotAvailable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFields {
    pub make: FieldValue,
    pub model_year: FieldValue,
    pub model: FieldValue,
    pub transmission: FieldValue,
    pub displacement_l: FieldValue,
    pub displacement_cc: FieldValue,
    pub fuel_type_primary: FieldValue,
    pub other_engine_info: FieldValue,
    pub engine_configuration: FieldValue,
}

impl RemoteFields {
    pub fn extract(raw: &RawRemoteRecord) -> Self {
        let transmission = match raw.field("Transmission Style") {
            FieldValue::Resolved(style) => FieldValue::Resolved(style),
            _ => raw.field("Transmission"),
        };

        Self {
            make: raw.field("Make"),
            model_year: raw.field("Model Year"),
            model: raw.field("Model"),
            transmission,
            displacement_l: raw.field("Displacement (L)"),
            displacement_cc: raw.field("Displacement (CC)"),
            fuel_type_primary: raw.field("Fuel Type - Primary"),
            other_engine_info: raw.field("Other Engine Info"),
            engine_configuration: raw.field("Engine Configuration"),
        }
    }
}

// ── Lookup seam ─────────────────────────────────────────────────────

/// Anything that can turn a VIN into a raw variable list.
pub trait VinLookup {
    fn fetch_raw(&self, vin: &Vin) -> Result<RawRemoteRecord, ResolverError>;
}

// ── HTTP resolver ───────────────────────────────────────────────────

/// Remote decode client (blocking).
#[derive(Clone)]
pub struct RemoteResolver {
    http: reqwest::blocking::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl RemoteResolver {
    pub fn new(policy: RetryPolicy) -> Result<Self, ResolverError> {
        Self::with_base_url(DEFAULT_BASE_URL, policy)
    }

    pub fn with_base_url(base_url: &str, policy: RetryPolicy) -> Result<Self, ResolverError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(policy.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ResolverError::Other(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn endpoint(&self, vin: &Vin) -> String {
        format!("{}/api/vehicles/DecodeVIN/{}", self.base_url, vin)
    }

    /// One request, no retry. A timeout comes back as `Timeout { attempts: 1 }`.
    fn attempt(&self, vin: &Vin) -> Result<RawRemoteRecord, ResolverError> {
        let resp = self
            .http
            .get(self.endpoint(vin))
            .query(&[("format", "json")])
            .send()
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ResolverError::Http {
                status: status.as_u16(),
                message: truncate(body.trim(), ERROR_BODY_LIMIT),
            });
        }

        let text = resp.text().map_err(transport_error)?;
        parse_results(&text)
    }
}

impl VinLookup for RemoteResolver {
    fn fetch_raw(&self, vin: &Vin) -> Result<RawRemoteRecord, ResolverError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!(vin = %vin, attempt, max_attempts, "querying remote decode service");

            match self.attempt(vin) {
                Ok(raw) => {
                    tracing::debug!(vin = %vin, variables = raw.variables.len(), "remote lookup answered");
                    return Ok(raw);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(
                        vin = %vin,
                        attempt,
                        max_attempts,
                        delay_ms = self.policy.retry_delay.as_millis() as u64,
                        "remote lookup timed out, retrying"
                    );
                    thread::sleep(self.policy.retry_delay);
                }
                Err(e) if e.is_retryable() => {
                    return Err(ResolverError::Timeout { attempts: attempt });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// ── Response handling ───────────────────────────────────────────────

fn transport_error(e: reqwest::Error) -> ResolverError {
    if e.is_timeout() {
        ResolverError::Timeout { attempts: 1 }
    } else {
        ResolverError::Other(e.to_string())
    }
}

/// Parse a response body into a raw record.
///
/// A leading BOM is tolerated. Missing or empty `Results` is `Empty`.
pub fn parse_results(body: &str) -> Result<RawRemoteRecord, ResolverError> {
    let trimmed = body.trim_start_matches('\u{feff}');
    let json: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
        ResolverError::Other(format!(
            "cannot parse response: {e} (body: {})",
            truncate(trimmed, ERROR_BODY_LIMIT)
        ))
    })?;

    let results = match json.get("Results").and_then(|r| r.as_array()) {
        Some(results) if !results.is_empty() => results,
        _ => return Err(ResolverError::Empty),
    };

    let variables = results
        .iter()
        .filter_map(|item| {
            let variable = item.get("Variable")?.as_str()?.to_string();
            let value = item.get("Value").and_then(json_value_to_string);
            Some(RemoteVariable { variable, value })
        })
        .collect();

    Ok(RawRemoteRecord { variables })
}

/// Stringify a JSON scalar. `null` is absent.
fn json_value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
