// HTTP client for the Uptime Robot v2 API.
//
// The API is RPC-over-POST: every call is `POST {base}/{method}` with
// form-encoded parameters, answered by a JSON envelope whose `stat`
// field signals application-level success. This module owns transport
// mechanics, envelope unwrapping, and the pagination loop; what to
// call and with which parameters is decided by `upkeep-core`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::resource::{Params, Resource, ServerId};
use crate::transport::TransportConfig;

/// Async client for the monitoring API.
///
/// Injects the API key and response format on every request and fails
/// uniformly with [`Error`] on transport, protocol, or application
/// errors. No retries: a failed call surfaces immediately.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// The path is normalized to end with a slash so method names can
    /// be joined onto it.
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    // ── Envelope handling ────────────────────────────────────────────

    /// Issue one POST request and unwrap the response envelope.
    ///
    /// Fails on non-2xx status, a body that is not JSON, or an envelope
    /// whose `stat` field is not `"ok"`.
    async fn post(&self, method: &str, params: &Params) -> Result<Value, Error> {
        let url = self.base_url.join(method)?;
        debug!("POST {url}");

        let mut form: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        form.push(("api_key", self.api_key.expose_secret()));
        form.push(("format", "json"));
        for (key, value) in params.pairs() {
            form.push((*key, value.as_str()));
        }

        let resp = self.http.post(url).form(&form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                method: method.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| Error::Decode {
            method: method.to_owned(),
            message: e.to_string(),
            body: preview(&body).to_owned(),
        })?;

        if data.get("stat").and_then(Value::as_str) != Some("ok") {
            return Err(Error::Api {
                method: method.to_owned(),
                message: error_message(&data),
            });
        }

        Ok(data)
    }

    // ── Resource operations ──────────────────────────────────────────

    /// Fetch every record of a resource kind, transparently paginating.
    ///
    /// Pages are requested sequentially: the offset advances by the
    /// server-reported page size until `offset + limit` reaches the
    /// reported total. Records are returned exactly once, in server
    /// order. The first request carries no offset parameter.
    pub async fn fetch_all(
        &self,
        resource: Resource,
        extra: &Params,
    ) -> Result<Vec<Map<String, Value>>, Error> {
        let method = resource.list_method();
        let mut params = extra.clone();
        let mut records = Vec::new();

        loop {
            let response = self.post(method, &params).await?;

            let page = response
                .get(resource.records_key())
                .and_then(Value::as_array)
                .ok_or_else(|| decode_error(method, format!("missing `{}` array", resource.records_key())))?;
            for record in page {
                let fields = record
                    .as_object()
                    .ok_or_else(|| decode_error(method, "non-object record in page".to_owned()))?;
                records.push(fields.clone());
            }

            // Newer servers nest the window under `pagination`; older
            // ones report it at the top level.
            let window = response.get("pagination").unwrap_or(&response);
            let total = window_int(window, method, "total")?;
            let offset = window_int(window, method, "offset")?;
            let limit = window_int(window, method, "limit")?;

            if total > offset + limit {
                params.set("offset", (offset + limit).to_string());
            } else {
                break;
            }
        }

        Ok(records)
    }

    /// Create a record, returning the server-assigned id.
    pub async fn create(&self, resource: Resource, params: &Params) -> Result<ServerId, Error> {
        let method = resource.create_method();
        let response = self.post(method, params).await?;
        response
            .get(resource.created_key())
            .and_then(|created| created.get("id"))
            .and_then(ServerId::from_value)
            .ok_or_else(|| decode_error(method, format!("missing `{}.id`", resource.created_key())))
    }

    /// Edit an existing record in place.
    pub async fn update(
        &self,
        resource: Resource,
        id: &ServerId,
        params: &Params,
    ) -> Result<(), Error> {
        let mut params = params.clone();
        params.set("id", id.as_str());
        self.post(resource.update_method(), &params).await?;
        Ok(())
    }

    /// Delete a record by id.
    pub async fn delete(&self, resource: Resource, id: &ServerId) -> Result<(), Error> {
        let params = Params::new().with("id", id.as_str());
        self.post(resource.delete_method(), &params).await?;
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn decode_error(method: &str, message: String) -> Error {
    Error::Decode {
        method: method.to_owned(),
        message,
        body: String::new(),
    }
}

/// Render the `error` payload of a failed envelope as a message.
fn error_message(data: &Value) -> String {
    match data.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), str::to_owned),
        None => "unknown error".to_owned(),
    }
}

/// Read an integer field of the pagination window, accepting either a
/// number or a numeric string.
fn window_int(window: &Value, method: &str, key: &str) -> Result<i64, Error> {
    let value = window
        .get(key)
        .ok_or_else(|| decode_error(method, format!("missing pagination field `{key}`")))?;
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| decode_error(method, format!("non-numeric pagination field `{key}`")))
}

/// First 200 characters of a body, for decode diagnostics.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}
