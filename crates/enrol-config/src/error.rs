// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

use crate::env::SecretEnvError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// A value the provisioner cannot run without is absent from every source.
	#[error("missing required setting {field}: set {env} (or `{field}` in the config file)")]
	MissingRequired { field: &'static str, env: &'static str },

	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("Failed to parse TOML config at {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Secret loading error: {0}")]
	Secret(#[from] SecretEnvError),
}

impl ConfigError {
	pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			key: key.into(),
			message: message.into(),
		}
	}

	/// True when the error means required configuration is absent.
	pub fn is_missing(&self) -> bool {
		matches!(self, Self::MissingRequired { .. })
	}
}
