// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Account specifications.

use std::fmt;
use std::str::FromStr;

use enrol_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::Metadata;

/// The kind of account being provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Student,
	Staff,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Student => "student",
			Self::Staff => "staff",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"student" => Ok(Self::Student),
			"staff" => Ok(Self::Staff),
			other => Err(format!("unknown role '{other}'")),
		}
	}
}

/// Role-dependent attributes, tagged by `role` in seed files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleAttributes {
	Student {
		track_no: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		department: Option<String>,
	},
	Staff {
		staff_id: String,
		unit: String,
	},
}

impl RoleAttributes {
	pub fn role(&self) -> Role {
		match self {
			Self::Student { .. } => Role::Student,
			Self::Staff { .. } => Role::Staff,
		}
	}
}

fn default_email_confirm() -> bool {
	true
}

/// One account to provision.
///
/// ```toml
/// [[account]]
/// email = "library@aju.ng"
/// password = "change-me-on-first-login"
/// name = "Library Officer"
/// role = "staff"
/// staff_id = "LIB001"
/// unit = "library"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSpec {
	pub email: String,
	pub password: SecretString,
	/// Mark the address as confirmed so no confirmation mail is sent.
	#[serde(default = "default_email_confirm")]
	pub email_confirm: bool,
	pub name: String,
	#[serde(flatten)]
	pub role: RoleAttributes,
}

impl AccountSpec {
	pub fn student(
		email: impl Into<String>,
		password: impl Into<SecretString>,
		name: impl Into<String>,
		track_no: impl Into<String>,
		department: Option<String>,
	) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
			email_confirm: true,
			name: name.into(),
			role: RoleAttributes::Student {
				track_no: track_no.into(),
				department,
			},
		}
	}

	pub fn staff(
		email: impl Into<String>,
		password: impl Into<SecretString>,
		name: impl Into<String>,
		staff_id: impl Into<String>,
		unit: impl Into<String>,
	) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
			email_confirm: true,
			name: name.into(),
			role: RoleAttributes::Staff {
				staff_id: staff_id.into(),
				unit: unit.into(),
			},
		}
	}

	pub fn role(&self) -> Role {
		self.role.role()
	}

	/// Metadata stored on the identity and echoed back on creation.
	pub fn metadata(&self) -> Metadata {
		let mut metadata = Metadata::new();
		metadata.insert("role".into(), Value::from(self.role().as_str()));
		metadata.insert("name".into(), Value::from(self.name.as_str()));

		match &self.role {
			RoleAttributes::Student {
				track_no,
				department,
			} => {
				metadata.insert("track_no".into(), Value::from(track_no.as_str()));
				if let Some(department) = department {
					metadata.insert("department".into(), Value::from(department.as_str()));
				}
			}
			RoleAttributes::Staff { staff_id, unit } => {
				metadata.insert("staff_id".into(), Value::from(staff_id.as_str()));
				metadata.insert("unit".into(), Value::from(unit.as_str()));
			}
		}

		metadata
	}
}
