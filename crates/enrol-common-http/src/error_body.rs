// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error bodies returned by the identity and table APIs.

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

/// Union of the error shapes the backend services return.
///
/// The identity API answers `{"code": 422, "error_code": "...", "msg": "..."}`
/// (older releases use `error` / `error_description`); the table API answers
/// `{"code": "23505", "message": "...", "details": "...", "hint": null}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
	#[serde(default)]
	pub code: Option<Value>,
	#[serde(default)]
	pub error_code: Option<String>,
	#[serde(default)]
	pub msg: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default)]
	pub error_description: Option<String>,
	#[serde(default)]
	pub details: Option<String>,
	#[serde(default)]
	pub hint: Option<String>,
}

impl ApiErrorBody {
	/// Parse a response body. Non-JSON bodies become the message verbatim.
	pub fn parse(body: &str) -> Self {
		match serde_json::from_str::<ApiErrorBody>(body) {
			Ok(parsed) => parsed,
			Err(e) => {
				trace!(error = %e, "error body is not JSON");
				let trimmed = body.trim();
				Self {
					message: (!trimmed.is_empty()).then(|| trimmed.to_string()),
					..Default::default()
				}
			}
		}
	}

	/// Machine-readable code: `error_code` when present, else `code`.
	pub fn code(&self) -> Option<String> {
		if let Some(code) = &self.error_code {
			return Some(code.clone());
		}
		match &self.code {
			Some(Value::String(s)) => Some(s.clone()),
			Some(Value::Number(n)) => Some(n.to_string()),
			_ => None,
		}
	}

	/// Human-readable message, with `details` appended when the API sent them.
	pub fn message(&self) -> String {
		let base = self
			.msg
			.as_ref()
			.or(self.message.as_ref())
			.or(self.error_description.as_ref())
			.or(self.error.as_ref())
			.cloned()
			.unwrap_or_else(|| "no error message".to_string());

		match &self.details {
			Some(details) if !details.is_empty() => format!("{base} ({details})"),
			_ => base,
		}
	}

	/// True when any of the text fields contains `needle` (case-insensitive).
	pub fn mentions(&self, needle: &str) -> bool {
		let needle = needle.to_lowercase();
		[
			self.error_code.as_ref(),
			self.msg.as_ref(),
			self.message.as_ref(),
			self.error.as_ref(),
			self.error_description.as_ref(),
			self.details.as_ref(),
		]
		.into_iter()
		.flatten()
		.any(|field| field.to_lowercase().contains(&needle))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_identity_error() {
		let body = ApiErrorBody::parse(
			r#"{"code":422,"error_code":"email_exists","msg":"A user with this email address has already been registered"}"#,
		);
		assert_eq!(body.code().as_deref(), Some("email_exists"));
		assert!(body.message().starts_with("A user with this email"));
		assert!(body.mentions("ALREADY BEEN REGISTERED"));
	}

	#[test]
	fn parses_table_error_with_details() {
		let body = ApiErrorBody::parse(
			r#"{"code":"23505","details":"Key (email)=(a@x) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"profiles_email_key\""}"#,
		);
		assert_eq!(body.code().as_deref(), Some("23505"));
		assert_eq!(
			body.message(),
			"duplicate key value violates unique constraint \"profiles_email_key\" (Key (email)=(a@x) already exists.)"
		);
	}

	#[test]
	fn numeric_code_without_error_code() {
		let body = ApiErrorBody::parse(r#"{"code":500,"msg":"boom"}"#);
		assert_eq!(body.code().as_deref(), Some("500"));
		assert_eq!(body.message(), "boom");
	}

	#[test]
	fn legacy_oauth_style_error() {
		let body =
			ApiErrorBody::parse(r#"{"error":"invalid_grant","error_description":"bad key"}"#);
		assert_eq!(body.message(), "bad key");
		assert!(body.code().is_none());
	}

	#[test]
	fn non_json_body_becomes_message() {
		let body = ApiErrorBody::parse("  upstream connect error  ");
		assert_eq!(body.message(), "upstream connect error");

		let empty = ApiErrorBody::parse("");
		assert_eq!(empty.message(), "no error message");
	}
}
