// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Identity service abstraction.

use async_trait::async_trait;
use enrol_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::account::AccountSpec;

/// Free-form metadata attached to an identity.
pub type Metadata = serde_json::Map<String, Value>;

/// Request to create one identity.
#[derive(Debug, Clone)]
pub struct CreateIdentity {
	pub email: String,
	pub password: SecretString,
	pub email_confirm: bool,
	pub metadata: Metadata,
}

impl From<&AccountSpec> for CreateIdentity {
	fn from(spec: &AccountSpec) -> Self {
		Self {
			email: spec.email.clone(),
			password: spec.password.clone(),
			email_confirm: spec.email_confirm,
			metadata: spec.metadata(),
		}
	}
}

/// An identity as returned by the service right after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
	/// Opaque identifier issued by the service.
	pub id: String,
	#[serde(default)]
	pub email: Option<String>,
	/// Metadata echoed back by the service.
	#[serde(default, rename = "user_metadata")]
	pub metadata: Metadata,
}

impl IdentityRecord {
	/// A string metadata value; non-string and empty values count as absent.
	pub fn metadata_str(&self, key: &str) -> Option<&str> {
		self
			.metadata
			.get(key)
			.and_then(Value::as_str)
			.filter(|s| !s.trim().is_empty())
	}
}

/// Errors that can occur when creating an identity.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
	/// The service already has an identity for this address.
	#[error("an account for {email} already exists")]
	AlreadyExists { email: String },

	/// The call succeeded but the response carried no identity.
	#[error("identity service returned no user")]
	NoIdentity,

	/// The service-role key was rejected.
	#[error("identity service rejected the service-role key")]
	Unauthorized,

	#[error("identity request timed out")]
	Timeout,

	#[error("transport error: {0}")]
	Transport(String),

	#[error("identity service error: {status} - {message}")]
	Api { status: u16, message: String },

	#[error("invalid response from identity service: {0}")]
	InvalidResponse(String),
}

/// Creates identities in an external identity service.
///
/// Password hashing, uniqueness enforcement and confirmation mail are owned by
/// the service.
#[async_trait]
pub trait IdentityService: Send + Sync {
	async fn create_user(&self, request: CreateIdentity) -> Result<IdentityRecord, IdentityError>;
}
