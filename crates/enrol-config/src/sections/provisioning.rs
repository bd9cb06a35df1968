// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning run settings: target tables and optional domain rows.

use serde::Deserialize;

pub const DEFAULT_PROFILES_TABLE: &str = "profiles";
pub const DEFAULT_STUDENTS_TABLE: &str = "students";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningConfig {
	pub profiles_table: String,
	pub students_table: String,
	/// Also insert a `students` row for every provisioned student.
	pub student_records: bool,
}

impl Default for ProvisioningConfig {
	fn default() -> Self {
		Self {
			profiles_table: DEFAULT_PROFILES_TABLE.to_string(),
			students_table: DEFAULT_STUDENTS_TABLE.to_string(),
			student_records: false,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisioningConfigLayer {
	#[serde(default)]
	pub profiles_table: Option<String>,
	#[serde(default)]
	pub students_table: Option<String>,
	#[serde(default)]
	pub student_records: Option<bool>,
}

impl ProvisioningConfigLayer {
	pub fn merge(&mut self, other: ProvisioningConfigLayer) {
		if other.profiles_table.is_some() {
			self.profiles_table = other.profiles_table;
		}
		if other.students_table.is_some() {
			self.students_table = other.students_table;
		}
		if other.student_records.is_some() {
			self.student_records = other.student_records;
		}
	}

	pub fn finalize(self) -> ProvisioningConfig {
		ProvisioningConfig {
			profiles_table: self
				.profiles_table
				.unwrap_or_else(|| DEFAULT_PROFILES_TABLE.to_string()),
			students_table: self
				.students_table
				.unwrap_or_else(|| DEFAULT_STUDENTS_TABLE.to_string()),
			student_records: self.student_records.unwrap_or(false),
		}
	}
}
