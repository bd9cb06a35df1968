// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the enrol provisioner.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file,
//!   environment, CLI flags)
//! - `VAR_FILE` secret loading for the service-role key
//! - A fail-fast check for the two settings the provisioner cannot run without
//!   (backend URL and service-role key)
//!
//! # Usage
//!
//! ```ignore
//! use enrol_config::{load_config, LoadOptions};
//!
//! let config = load_config(LoadOptions::default())?;
//! println!("provisioning against {}", config.backend.url);
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use std::path::PathBuf;

pub use error::ConfigError;
pub use layer::EnrolConfigLayer;
pub use sections::*;
pub use sources::{
	CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
};

use enrol_provisioning_core::validate_table_name;
use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct EnrolConfig {
	pub backend: BackendConfig,
	pub provisioning: ProvisioningConfig,
	pub http: HttpConfig,
	pub logging: LoggingConfig,
}

/// Inputs to [`load_config`] that come from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
	/// Explicit config file; must exist. Without it `./enrol.toml` is tried.
	pub config_file: Option<PathBuf>,
	pub cli: CliOverrides,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. CLI flags
/// 2. Environment variables (`ENROL_*`, then `SUPABASE_*`)
/// 3. Config file (`--config` or `./enrol.toml`)
/// 4. Built-in defaults
pub fn load_config(options: LoadOptions) -> Result<EnrolConfig, ConfigError> {
	load_from_sources(standard_sources(options, EnvSource::process()))
}

/// The source stack [`load_config`] uses, reading variables from `env`.
pub fn standard_sources(options: LoadOptions, env: EnvSource) -> Vec<Box<dyn ConfigSource>> {
	let file_source = match options.config_file {
		Some(path) => TomlSource::required(path),
		None => TomlSource::working_dir(),
	};

	vec![
		Box::new(DefaultsSource),
		Box::new(file_source),
		Box::new(env),
		Box::new(CliSource::new(options.cli)),
	]
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<EnrolConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = EnrolConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: EnrolConfigLayer) -> Result<EnrolConfig, ConfigError> {
	let backend = layer.backend.unwrap_or_default().finalize()?;
	let provisioning = layer.provisioning.unwrap_or_default().finalize();
	let http = layer.http.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&provisioning)?;

	info!(
		backend_url = %backend.url,
		service_role_key = %backend.service_role_key,
		profiles_table = %provisioning.profiles_table,
		students_table = %provisioning.students_table,
		student_records = provisioning.student_records,
		timeout_secs = http.timeout.as_secs(),
		"configuration loaded"
	);

	Ok(EnrolConfig {
		backend,
		provisioning,
		http,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(provisioning: &ProvisioningConfig) -> Result<(), ConfigError> {
	for (key, table) in [
		("provisioning.profiles_table", &provisioning.profiles_table),
		("provisioning.students_table", &provisioning.students_table),
	] {
		validate_table_name(table).map_err(|e| ConfigError::invalid_value(key, e.to_string()))?;
	}

	if provisioning.profiles_table == provisioning.students_table {
		return Err(ConfigError::Validation(format!(
			"profiles and students tables must differ (both are '{}')",
			provisioning.profiles_table
		)));
	}
	Ok(())
}
