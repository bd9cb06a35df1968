// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Seed files: lists of accounts to provision.
//!
//! TOML seeds use one `[[account]]` table per account. JSON seeds are either
//! a top-level array or `{"account": [...]}`.

use std::path::{Path, PathBuf};

use enrol_provisioning_core::{AccountSpec, RoleAttributes};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
	#[error("failed to read seed file {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("unsupported seed file extension for {0} (expected .toml or .json)")]
	UnsupportedFormat(PathBuf),

	#[error("invalid TOML seed: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("invalid JSON seed: {0}")]
	Json(#[from] serde_json::Error),

	#[error("account #{index} ({email}): {reason}")]
	Invalid {
		index: usize,
		email: String,
		reason: String,
	},
}

#[derive(Debug, Deserialize)]
struct SeedDocument {
	#[serde(default)]
	account: Vec<AccountSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSeed {
	List(Vec<AccountSpec>),
	Document(SeedDocument),
}

/// Load and validate a seed file; the format follows the extension.
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<AccountSpec>, SeedError> {
	let path = path.as_ref();
	let extension = path
		.extension()
		.and_then(|e| e.to_str())
		.map(str::to_ascii_lowercase);

	let parse: fn(&str) -> Result<Vec<AccountSpec>, SeedError> = match extension.as_deref() {
		Some("toml") => parse_seed_toml,
		Some("json") => parse_seed_json,
		_ => return Err(SeedError::UnsupportedFormat(path.to_path_buf())),
	};

	debug!(path = %path.display(), "loading seed file");
	let content = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
		path: path.to_path_buf(),
		source,
	})?;

	let specs = parse(&content)?;
	info!(path = %path.display(), count = specs.len(), "seed file loaded");
	Ok(specs)
}

pub fn parse_seed_toml(content: &str) -> Result<Vec<AccountSpec>, SeedError> {
	let document: SeedDocument = toml::from_str(content)?;
	validate_specs(&document.account)?;
	Ok(document.account)
}

pub fn parse_seed_json(content: &str) -> Result<Vec<AccountSpec>, SeedError> {
	let specs = match serde_json::from_str::<JsonSeed>(content)? {
		JsonSeed::List(specs) => specs,
		JsonSeed::Document(document) => document.account,
	};
	validate_specs(&specs)?;
	Ok(specs)
}

/// Reject specs that can never succeed. Duplicate emails are allowed: the
/// identity service reports those per item.
pub fn validate_specs(specs: &[AccountSpec]) -> Result<(), SeedError> {
	for (index, spec) in specs.iter().enumerate() {
		if let Some(reason) = invalid_reason(spec) {
			return Err(SeedError::Invalid {
				index: index + 1,
				email: spec.email.clone(),
				reason: reason.to_string(),
			});
		}
	}
	Ok(())
}

fn invalid_reason(spec: &AccountSpec) -> Option<&'static str> {
	let blank = |s: &str| s.trim().is_empty();

	if blank(&spec.email) {
		return Some("email is empty");
	}
	if !spec.email.contains('@') {
		return Some("email has no '@'");
	}
	if spec.password.is_blank() {
		return Some("password is empty");
	}
	if blank(&spec.name) {
		return Some("name is empty");
	}

	match &spec.role {
		RoleAttributes::Student { track_no, .. } if blank(track_no) => Some("track_no is empty"),
		RoleAttributes::Staff { staff_id, .. } if blank(staff_id) => Some("staff_id is empty"),
		RoleAttributes::Staff { unit, .. } if blank(unit) => Some("unit is empty"),
		_ => None,
	}
}
