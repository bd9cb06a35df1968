// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Lookups go through an [`EnvLookup`] so the same parsing code runs against
//! the process environment in production and against a plain map in tests.
//! Secrets support the `VAR_FILE` convention used by Docker and Kubernetes
//! secret mounts.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use enrol_common_secret::SecretString;
use thiserror::Error;

use crate::error::ConfigError;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// A source of environment variables.
pub trait EnvLookup: Send + Sync {
	fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
	fn get(&self, name: &str) -> Option<String> {
		std::env::var(name).ok()
	}
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
	pub fn new<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		Self(
			vars
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

impl EnvLookup for MapEnv {
	fn get(&self, name: &str) -> Option<String> {
		self.0.get(name).cloned()
	}
}

/// Read a variable, treating empty or whitespace-only values as unset.
pub fn var(env: &dyn EnvLookup, name: &str) -> Option<String> {
	env
		.get(name)
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

/// Read the first set variable among `names`, in order.
pub fn first_var(env: &dyn EnvLookup, names: &[&str]) -> Option<String> {
	names.iter().find_map(|name| var(env, name))
}

pub fn parse_bool(env: &dyn EnvLookup, name: &str) -> Result<Option<bool>, ConfigError> {
	match var(env, name) {
		Some(v) => match v.to_ascii_lowercase().as_str() {
			"1" | "true" | "yes" | "on" => Ok(Some(true)),
			"0" | "false" | "no" | "off" => Ok(Some(false)),
			_ => Err(ConfigError::invalid_value(
				name,
				format!("invalid boolean value '{v}'"),
			)),
		},
		None => Ok(None),
	}
}

pub fn parse_u64(env: &dyn EnvLookup, name: &str) -> Result<Option<u64>, ConfigError> {
	match var(env, name) {
		Some(v) => v
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::invalid_value(name, format!("invalid u64 value '{v}'"))),
		None => Ok(None),
	}
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// `VAR_FILE` wins over `VAR`. A single trailing newline is stripped from file
/// contents. Returns `Ok(None)` when neither is set.
pub fn load_secret(env: &dyn EnvLookup, name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{name}_FILE");

	if let Some(path_str) = env.get(&file_var) {
		if path_str.trim().is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(path_str.trim());
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(var(env, name).map(SecretString::new))
}

/// Load the first secret found among `names`, in order.
pub fn load_first_secret(
	env: &dyn EnvLookup,
	names: &[&str],
) -> Result<Option<SecretString>, SecretEnvError> {
	for name in names {
		if let Some(secret) = load_secret(env, name)? {
			return Ok(Some(secret));
		}
	}
	Ok(None)
}
