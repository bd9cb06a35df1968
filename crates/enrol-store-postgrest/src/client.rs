// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::time::Duration;

use async_trait::async_trait;
use enrol_common_http::{with_service_role, ApiErrorBody};
use enrol_common_secret::SecretString;
use enrol_provisioning_core::{validate_table_name, DataStore, StoreError};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument, trace};

/// Prefix of the table endpoints, relative to the project URL.
pub const REST_PATH: &str = "/rest/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const RETURN_REPRESENTATION: &str = "return=representation";

/// Client for a PostgREST table API.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
	http_client: Client,
	base_url: String,
	service_role_key: SecretString,
	timeout: Duration,
}

impl PostgrestClient {
	pub fn new(
		base_url: impl Into<String>,
		service_role_key: SecretString,
	) -> Result<Self, reqwest::Error> {
		let http_client = enrol_common_http::new_client()?;
		Ok(Self {
			http_client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			service_role_key,
			timeout: DEFAULT_TIMEOUT,
		})
	}

	/// Sets the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Shares an existing HTTP client (connection pool) with this one.
	pub fn with_http_client(mut self, http_client: Client) -> Self {
		self.http_client = http_client;
		self
	}

	fn table_url(&self, table: &str) -> String {
		format!("{}{}/{}", self.base_url, REST_PATH, table)
	}
}

#[async_trait]
impl DataStore for PostgrestClient {
	#[instrument(skip(self, row), fields(table = %table))]
	async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError> {
		validate_table_name(table)?;
		let url = self.table_url(table);

		debug!(url = %url, "sending insert request");

		let response = with_service_role(self.http_client.post(&url), &self.service_role_key)
			.timeout(self.timeout)
			.header("Prefer", RETURN_REPRESENTATION)
			.json(&row)
			.send()
			.await
			.map_err(from_transport)?;

		let status = response.status();
		debug!(status = %status, "received insert response");

		let text = response.text().await.map_err(from_transport)?;

		if !status.is_success() {
			return Err(from_status(status.as_u16(), &text));
		}

		trace!(body = %text, "insert response body");
		let rows = parse_rows(&text)?;
		debug!(row_count = rows.len(), "insert completed");
		Ok(rows)
	}
}

fn from_transport(e: reqwest::Error) -> StoreError {
	if e.is_timeout() {
		error!("insert request timed out");
		return StoreError::Timeout;
	}
	error!(error = %e, "network error during insert request");
	StoreError::Transport(e.to_string())
}

fn from_status(status: u16, body: &str) -> StoreError {
	if status == 401 || status == 403 {
		error!(status, "data store rejected the service-role key");
		return StoreError::Unauthorized;
	}

	let parsed = ApiErrorBody::parse(body);
	let code = parsed.code();
	let message = parsed.message();
	error!(status, code = ?code, message = %message, "data store API error");
	StoreError::Api {
		status,
		code,
		message,
	}
}

/// Inserted rows: a JSON array, a single object, or nothing.
fn parse_rows(body: &str) -> Result<Vec<Value>, StoreError> {
	if body.trim().is_empty() {
		return Ok(Vec::new());
	}

	match serde_json::from_str::<Value>(body) {
		Ok(Value::Array(rows)) => Ok(rows),
		Ok(Value::Null) => Ok(Vec::new()),
		Ok(row @ Value::Object(_)) => Ok(vec![row]),
		Ok(other) => Err(StoreError::InvalidResponse(format!(
			"expected rows, got {other}"
		))),
		Err(e) => {
			error!(error = %e, "failed to parse insert response");
			Err(StoreError::InvalidResponse(format!("JSON parse error: {e}")))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{body_json, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client(server: &MockServer) -> PostgrestClient {
		PostgrestClient::new(server.uri(), SecretString::from("svc-key")).unwrap()
	}

	#[tokio::test]
	async fn insert_returns_representation() {
		let server = MockServer::start().await;
		let row = json!({ "user_id": "u-1", "email": "lib@aju.ng", "role": "staff" });

		Mock::given(method("POST"))
			.and(path("/rest/v1/profiles"))
			.and(header("apikey", "svc-key"))
			.and(header("authorization", "Bearer svc-key"))
			.and(header("prefer", "return=representation"))
			.and(body_json(row.clone()))
			.respond_with(ResponseTemplate::new(201).set_body_json(json!([row.clone()])))
			.expect(1)
			.mount(&server)
			.await;

		let rows = client(&server).insert("profiles", row.clone()).await.unwrap();
		assert_eq!(rows, vec![row]);
	}

	#[tokio::test]
	async fn empty_created_body_is_no_rows() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/rest/v1/students"))
			.respond_with(ResponseTemplate::new(201))
			.mount(&server)
			.await;

		let rows = client(&server)
			.insert("students", json!({ "user_id": "u" }))
			.await
			.unwrap();
		assert!(rows.is_empty());
	}

	#[tokio::test]
	async fn constraint_violation_maps_to_api_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(409).set_body_json(json!({
				"code": "23505",
				"details": "Key (user_id)=(u-1) already exists.",
				"hint": null,
				"message": "duplicate key value violates unique constraint \"profiles_pkey\""
			})))
			.mount(&server)
			.await;

		let err = client(&server)
			.insert("profiles", json!({ "user_id": "u-1" }))
			.await
			.unwrap_err();
		match err {
			StoreError::Api {
				status,
				code,
				message,
			} => {
				assert_eq!(status, 409);
				assert_eq!(code.as_deref(), Some("23505"));
				assert!(message.contains("profiles_pkey"));
				assert!(message.contains("already exists"));
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[tokio::test]
	async fn rejected_key_maps_to_unauthorized() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(401))
			.mount(&server)
			.await;

		let err = client(&server)
			.insert("profiles", json!({}))
			.await
			.unwrap_err();
		assert!(matches!(err, StoreError::Unauthorized));
	}

	#[tokio::test]
	async fn invalid_table_sends_nothing() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(201))
			.expect(0)
			.mount(&server)
			.await;

		let err = client(&server)
			.insert("profiles?on_conflict=id", json!({}))
			.await
			.unwrap_err();
		assert!(matches!(err, StoreError::InvalidTable(_)));
	}

	#[test]
	fn parse_rows_shapes() {
		assert_eq!(parse_rows("").unwrap(), Vec::<Value>::new());
		assert_eq!(parse_rows("[]").unwrap(), Vec::<Value>::new());
		assert_eq!(parse_rows(r#"{"a":1}"#).unwrap(), vec![json!({ "a": 1 })]);
		assert!(matches!(
			parse_rows("42"),
			Err(StoreError::InvalidResponse(_))
		));
		assert!(matches!(
			parse_rows("<html>"),
			Err(StoreError::InvalidResponse(_))
		));
	}
}
