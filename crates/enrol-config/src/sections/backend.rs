// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backend (identity + table API) connection settings.

use enrol_common_secret::SecretString;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Backend connection (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct BackendConfig {
	/// Project base URL without a trailing slash, e.g. `https://abc.supabase.co`.
	pub url: String,
	pub service_role_key: SecretString,
}

/// Backend configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub service_role_key: Option<SecretString>,
}

impl BackendConfigLayer {
	pub fn merge(&mut self, other: BackendConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.service_role_key.is_some() {
			self.service_role_key = other.service_role_key;
		}
	}

	/// Both fields are required; neither has a default.
	pub fn finalize(self) -> Result<BackendConfig, ConfigError> {
		let url = self
			.url
			.filter(|u| !u.trim().is_empty())
			.ok_or(ConfigError::MissingRequired {
				field: "backend.url",
				env: "ENROL_BACKEND_URL",
			})?;
		let service_role_key = self
			.service_role_key
			.filter(|k| !k.is_blank())
			.ok_or(ConfigError::MissingRequired {
				field: "backend.service_role_key",
				env: "ENROL_SERVICE_ROLE_KEY",
			})?;

		let parsed = Url::parse(url.trim())
			.map_err(|e| ConfigError::invalid_value("backend.url", format!("'{url}': {e}")))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ConfigError::invalid_value(
				"backend.url",
				format!("unsupported scheme '{}'", parsed.scheme()),
			));
		}

		Ok(BackendConfig {
			url: parsed.as_str().trim_end_matches('/').to_string(),
			service_role_key,
		})
	}
}
