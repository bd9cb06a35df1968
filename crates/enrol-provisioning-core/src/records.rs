// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Rows derived from a created identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::account::{AccountSpec, Role};
use crate::identity::IdentityRecord;

/// Why a profile could not be derived from an identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileValidationError {
	#[error("identity has an empty id")]
	MissingIdentityId,

	#[error("identity has no email")]
	MissingEmail,

	#[error("identity email '{found}' does not match '{expected}'")]
	EmailMismatch { expected: String, found: String },

	#[error("identity metadata is missing '{0}'")]
	MissingMetadata(&'static str),

	#[error("identity metadata has an invalid role: {0}")]
	InvalidRole(String),

	#[error("identity metadata role '{found}' does not match requested role '{expected}'")]
	RoleMismatch { expected: Role, found: Role },
}

/// One row of the profiles table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
	pub user_id: String,
	pub email: String,
	pub name: String,
	pub role: Role,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub track_no: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub department: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub staff_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit: Option<String>,
}

impl ProfileRecord {
	/// Build the profile from what the identity service echoed back.
	///
	/// Role, name and role fields come from the identity metadata, not from
	/// `spec`, which only serves to check that the echo is consistent.
	pub fn from_identity(
		identity: &IdentityRecord,
		spec: &AccountSpec,
	) -> Result<Self, ProfileValidationError> {
		if identity.id.trim().is_empty() {
			return Err(ProfileValidationError::MissingIdentityId);
		}

		let email = identity
			.email
			.as_deref()
			.filter(|e| !e.trim().is_empty())
			.ok_or(ProfileValidationError::MissingEmail)?;
		if !email.eq_ignore_ascii_case(&spec.email) {
			return Err(ProfileValidationError::EmailMismatch {
				expected: spec.email.clone(),
				found: email.to_string(),
			});
		}

		let role: Role = identity
			.metadata_str("role")
			.ok_or(ProfileValidationError::MissingMetadata("role"))?
			.parse()
			.map_err(ProfileValidationError::InvalidRole)?;
		if role != spec.role() {
			return Err(ProfileValidationError::RoleMismatch {
				expected: spec.role(),
				found: role,
			});
		}

		let required = |key: &'static str| {
			identity
				.metadata_str(key)
				.map(str::to_string)
				.ok_or(ProfileValidationError::MissingMetadata(key))
		};

		let mut profile = Self {
			user_id: identity.id.clone(),
			email: email.to_string(),
			name: required("name")?,
			role,
			track_no: None,
			department: None,
			staff_id: None,
			unit: None,
		};

		match role {
			Role::Student => {
				profile.track_no = Some(required("track_no")?);
				profile.department = identity.metadata_str("department").map(str::to_string);
			}
			Role::Staff => {
				profile.staff_id = Some(required("staff_id")?);
				profile.unit = Some(required("unit")?);
			}
		}

		Ok(profile)
	}

	pub fn to_row(&self) -> Result<Value, serde_json::Error> {
		serde_json::to_value(self)
	}
}

/// One row of the students table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
	pub user_id: String,
	pub name: String,
	pub track_no: String,
	pub email: String,
}

/// A role-specific row written after the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRecord {
	Student(StudentRecord),
}

impl DomainRecord {
	/// The domain row for a profile, if its role has one.
	pub fn for_profile(profile: &ProfileRecord) -> Option<Self> {
		match (profile.role, &profile.track_no) {
			(Role::Student, Some(track_no)) => Some(Self::Student(StudentRecord {
				user_id: profile.user_id.clone(),
				name: profile.name.clone(),
				track_no: track_no.clone(),
				email: profile.email.clone(),
			})),
			_ => None,
		}
	}

	pub fn user_id(&self) -> &str {
		match self {
			Self::Student(record) => &record.user_id,
		}
	}

	pub fn to_row(&self) -> Result<Value, serde_json::Error> {
		match self {
			Self::Student(record) => serde_json::to_value(record),
		}
	}
}
