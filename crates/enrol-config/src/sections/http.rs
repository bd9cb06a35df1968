// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound HTTP client settings.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
	pub timeout: Duration,
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfigLayer {
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: HttpConfigLayer) {
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> Result<HttpConfig, ConfigError> {
		let secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
		if secs == 0 {
			return Err(ConfigError::invalid_value(
				"http.timeout_secs",
				"must be greater than zero",
			));
		}
		Ok(HttpConfig {
			timeout: Duration::from_secs(secs),
		})
	}
}
