// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files, environment and CLI flags.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::env::{self, EnvLookup, ProcessEnv};
use crate::error::ConfigError;
use crate::layer::EnrolConfigLayer;
use crate::sections::{
	BackendConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer, ProvisioningConfigLayer,
};

/// Backend URL variables, most specific first. The `SUPABASE_*` names match
/// what existing project `.env` files already define.
pub const BACKEND_URL_VARS: &[&str] = &[
	"ENROL_BACKEND_URL",
	"SUPABASE_URL",
	"NEXT_PUBLIC_SUPABASE_URL",
];

/// Service-role key variables, most specific first. Each also honours `*_FILE`.
pub const SERVICE_ROLE_KEY_VARS: &[&str] = &["ENROL_SERVICE_ROLE_KEY", "SUPABASE_SERVICE_ROLE_KEY"];

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "enrol.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<EnrolConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<EnrolConfigLayer, ConfigError> {
		Ok(EnrolConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
	required: bool,
}

impl TomlSource {
	/// A file the operator named explicitly; it must exist.
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	/// A conventional location that is skipped when absent.
	pub fn optional(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// `./enrol.toml`, skipped when absent.
	pub fn working_dir() -> Self {
		Self::optional(DEFAULT_CONFIG_FILE)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<EnrolConfigLayer, ConfigError> {
		if !self.required && !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(EnrolConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: EnrolConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `ENROL_<FIELD>`, with the `SUPABASE_*` fallbacks for the
/// backend connection.
pub struct EnvSource {
	env: Box<dyn EnvLookup>,
}

impl EnvSource {
	/// Read from the process environment.
	pub fn process() -> Self {
		Self::with_lookup(ProcessEnv)
	}

	pub fn with_lookup(env: impl EnvLookup + 'static) -> Self {
		Self { env: Box::new(env) }
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<EnrolConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let lookup = self.env.as_ref();

		let log_format = env::var(lookup, "ENROL_LOG_FORMAT")
			.map(|v| v.parse::<LogFormat>())
			.transpose()?;

		Ok(EnrolConfigLayer {
			backend: Some(BackendConfigLayer {
				url: env::first_var(lookup, BACKEND_URL_VARS),
				service_role_key: env::load_first_secret(lookup, SERVICE_ROLE_KEY_VARS)?,
			}),
			provisioning: Some(ProvisioningConfigLayer {
				profiles_table: env::var(lookup, "ENROL_PROFILES_TABLE"),
				students_table: env::var(lookup, "ENROL_STUDENTS_TABLE"),
				student_records: env::parse_bool(lookup, "ENROL_STUDENT_RECORDS")?,
			}),
			http: Some(HttpConfigLayer {
				timeout_secs: env::parse_u64(lookup, "ENROL_HTTP_TIMEOUT_SECS")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: env::var(lookup, "ENROL_LOG_LEVEL"),
				format: log_format,
			}),
		})
	}
}

/// Values supplied as command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub backend_url: Option<String>,
	pub profiles_table: Option<String>,
	pub students_table: Option<String>,
	pub student_records: Option<bool>,
	pub log_level: Option<String>,
	pub log_format: Option<LogFormat>,
}

/// Command-line flag source; highest precedence.
pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<EnrolConfigLayer, ConfigError> {
		let o = self.overrides.clone();
		Ok(EnrolConfigLayer {
			backend: Some(BackendConfigLayer {
				url: o.backend_url,
				service_role_key: None,
			}),
			provisioning: Some(ProvisioningConfigLayer {
				profiles_table: o.profiles_table,
				students_table: o.students_table,
				student_records: o.student_records,
			}),
			http: None,
			logging: Some(LoggingConfigLayer {
				level: o.log_level,
				format: o.log_format,
			}),
		})
	}
}
