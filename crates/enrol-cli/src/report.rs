// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Console lines for the operator.

use enrol_provisioning::{
	AccountSpec, BatchSummary, ProvisionOptions, ProvisionResult, RoleAttributes,
};

/// Exit status when `--strict` is set and at least one account failed.
pub const EXIT_FAILURES: u8 = 2;

pub fn result_line(result: &ProvisionResult) -> String {
	if result.is_success() {
		let id = result.identity_id.as_deref().unwrap_or("no id");
		return format!("✓ {} ({id})", result.email());
	}

	let mut line = format!("✗ {}: {}", result.email(), result.status);
	if let Some(detail) = &result.detail {
		line.push_str(": ");
		line.push_str(detail);
	}
	if let Some(id) = &result.identity_id {
		line.push_str(&format!(" [identity {id} was created]"));
	}
	line
}

/// What a real run would write for `spec`.
pub fn plan_line(spec: &AccountSpec, options: &ProvisionOptions) -> String {
	let (role, tables) = match &spec.role {
		RoleAttributes::Staff { staff_id, unit } => (
			format!("staff {staff_id}/{unit}"),
			options.profiles_table.clone(),
		),
		RoleAttributes::Student { track_no, .. } => {
			let tables = if options.student_records {
				format!("{}, {}", options.profiles_table, options.students_table)
			} else {
				options.profiles_table.clone()
			};
			(format!("student {track_no}"), tables)
		}
	};
	format!("- {} \"{}\" ({role}) -> identity, {tables}", spec.email, spec.name)
}

pub fn summary_line(summary: &BatchSummary) -> String {
	let mark = if summary.all_succeeded() { "✅" } else { "⚠️" };
	format!("{mark} {summary}")
}

pub fn exit_status(summary: &BatchSummary, strict: bool) -> u8 {
	if strict && !summary.all_succeeded() {
		EXIT_FAILURES
	} else {
		0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use enrol_provisioning::ProvisionStatus;
	use std::time::Duration;

	fn result(status: ProvisionStatus, id: Option<&str>, detail: Option<&str>) -> ProvisionResult {
		ProvisionResult {
			spec: AccountSpec::staff("exams@aju.ng", "pw", "Exams", "EXM001", "exams"),
			status,
			identity_id: id.map(str::to_string),
			detail: detail.map(str::to_string),
			elapsed: Duration::ZERO,
		}
	}

	#[test]
	fn success_line_shows_identity() {
		assert_eq!(
			result_line(&result(ProvisionStatus::Ok, Some("u-1"), None)),
			"✓ exams@aju.ng (u-1)"
		);
	}

	#[test]
	fn failure_line_shows_status_and_detail() {
		assert_eq!(
			result_line(&result(
				ProvisionStatus::IdentityFailed,
				None,
				Some("an account for exams@aju.ng already exists")
			)),
			"✗ exams@aju.ng: identity_failed: an account for exams@aju.ng already exists"
		);
	}

	#[test]
	fn partial_failure_mentions_orphan_identity() {
		let line = result_line(&result(
			ProvisionStatus::ProfileFailed,
			Some("u-9"),
			Some("insert into profiles returned no rows"),
		));
		assert!(line.starts_with("✗ exams@aju.ng: profile_failed: "));
		assert!(line.ends_with("[identity u-9 was created]"));
	}

	#[test]
	fn plan_lists_tables() {
		let student = AccountSpec::student("test@aju.ng", "123456", "Test Student", "25/132001", None);
		let mut options = ProvisionOptions::default();
		assert_eq!(
			plan_line(&student, &options),
			"- test@aju.ng \"Test Student\" (student 25/132001) -> identity, profiles"
		);

		options.student_records = true;
		assert!(plan_line(&student, &options).ends_with("profiles, students"));

		let staff = AccountSpec::staff("lib@aju.ng", "pw", "Library Officer", "LIB001", "library");
		assert_eq!(
			plan_line(&staff, &options),
			"- lib@aju.ng \"Library Officer\" (staff LIB001/library) -> identity, profiles"
		);
	}

	#[test]
	fn strict_mode_controls_exit_status() {
		let failed = BatchSummary::from_results(&[
			result(ProvisionStatus::Ok, Some("u"), None),
			result(ProvisionStatus::Unexpected, None, Some("panicked")),
		]);
		assert_eq!(exit_status(&failed, false), 0);
		assert_eq!(exit_status(&failed, true), EXIT_FAILURES);

		let clean = BatchSummary::from_results(&[result(ProvisionStatus::Ok, Some("u"), None)]);
		assert_eq!(exit_status(&clean, true), 0);
		assert!(summary_line(&clean).starts_with("✅ 1 account(s) processed"));
	}
}
