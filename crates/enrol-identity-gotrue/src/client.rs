// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::time::Duration;

use async_trait::async_trait;
use enrol_common_http::with_service_role;
use enrol_common_secret::SecretString;
use enrol_provisioning_core::{
	CreateIdentity, IdentityError, IdentityRecord, IdentityService, Metadata,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument, trace};

use crate::error::{from_status, from_transport};

/// Path of the admin user-creation endpoint, relative to the project URL.
pub const ADMIN_USERS_PATH: &str = "/auth/v1/admin/users";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the GoTrue admin API.
#[derive(Debug, Clone)]
pub struct GoTrueClient {
	http_client: Client,
	base_url: String,
	service_role_key: SecretString,
	timeout: Duration,
}

#[derive(Debug, Serialize)]
struct AdminCreateUserRequest<'a> {
	email: &'a str,
	password: &'a str,
	email_confirm: bool,
	user_metadata: &'a Metadata,
}

impl GoTrueClient {
	/// Creates a client for the project at `base_url` (e.g.
	/// `https://abc.supabase.co`).
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

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn endpoint(&self) -> String {
		format!("{}{}", self.base_url, ADMIN_USERS_PATH)
	}
}

#[async_trait]
impl IdentityService for GoTrueClient {
	#[instrument(skip(self, request), fields(email = %request.email))]
	async fn create_user(&self, request: CreateIdentity) -> Result<IdentityRecord, IdentityError> {
		let url = self.endpoint();
		let password = request.password.expose();
		let body = AdminCreateUserRequest {
			email: &request.email,
			password: password.as_str(),
			email_confirm: request.email_confirm,
			user_metadata: &request.metadata,
		};

		debug!(url = %url, "sending create-user request");

		let response = with_service_role(self.http_client.post(&url), &self.service_role_key)
			.timeout(self.timeout)
			.json(&body)
			.send()
			.await
			.map_err(from_transport)?;

		let status = response.status();
		debug!(status = %status, "received create-user response");

		let text = response.text().await.map_err(from_transport)?;

		if !status.is_success() {
			return Err(from_status(status.as_u16(), &text, &request.email));
		}

		trace!(body = %text, "create-user response body");
		let identity = parse_user(&text)?;
		debug!(identity_id = %identity.id, "identity created");
		Ok(identity)
	}
}

/// Parse a create-user response.
///
/// Accepts either the user object itself or `{"user": {...}}`. A null or
/// missing user, or one without an id, is [`IdentityError::NoIdentity`].
fn parse_user(body: &str) -> Result<IdentityRecord, IdentityError> {
	if body.trim().is_empty() {
		error!("identity service returned an empty body");
		return Err(IdentityError::NoIdentity);
	}

	let value: Value = serde_json::from_str(body).map_err(|e| {
		error!(error = %e, "failed to parse create-user response");
		IdentityError::InvalidResponse(format!("JSON parse error: {e}"))
	})?;

	let user = match value {
		Value::Object(mut map) if map.contains_key("user") => {
			map.remove("user").unwrap_or(Value::Null)
		}
		other => other,
	};

	match &user {
		Value::Object(map) if map.get("id").map_or(true, Value::is_null) => {
			return Err(IdentityError::NoIdentity)
		}
		Value::Object(_) => {}
		Value::Null => return Err(IdentityError::NoIdentity),
		_ => {
			return Err(IdentityError::InvalidResponse(
				"expected a user object".to_string(),
			))
		}
	}

	serde_json::from_value(user).map_err(|e| {
		error!(error = %e, "create-user response has an unexpected shape");
		IdentityError::InvalidResponse(e.to_string())
	})
}
