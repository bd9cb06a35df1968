// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use enrol_provisioning_core::{
	AccountSpec, CreateIdentity, DataStore, DomainRecord, IdentityService, ProfileRecord,
};
use futures::FutureExt;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::result::{BatchSummary, ProvisionResult, ProvisionStatus};

/// Table names and optional steps for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
	pub profiles_table: String,
	pub students_table: String,
	/// Also write a students row for every student spec.
	pub student_records: bool,
}

impl Default for ProvisionOptions {
	fn default() -> Self {
		Self {
			profiles_table: "profiles".to_string(),
			students_table: "students".to_string(),
			student_records: false,
		}
	}
}

/// A failed step: the status it maps to and what went wrong.
struct StepFailure {
	status: ProvisionStatus,
	detail: String,
}

impl StepFailure {
	fn new(status: ProvisionStatus, detail: impl Into<String>) -> Self {
		Self {
			status,
			detail: detail.into(),
		}
	}
}

/// Creates identities and their dependent rows.
///
/// Items are processed strictly one after another. Writes are never rolled
/// back: an identity whose profile insert fails stays in the identity service
/// and is reported as [`ProvisionStatus::ProfileFailed`].
#[derive(Clone)]
pub struct Provisioner {
	identity: Arc<dyn IdentityService>,
	store: Arc<dyn DataStore>,
	options: ProvisionOptions,
}

impl Provisioner {
	pub fn new(
		identity: Arc<dyn IdentityService>,
		store: Arc<dyn DataStore>,
		options: ProvisionOptions,
	) -> Self {
		Self {
			identity,
			store,
			options,
		}
	}

	pub fn options(&self) -> &ProvisionOptions {
		&self.options
	}

	/// Provision every spec in order. A failing item never stops the batch.
	#[instrument(skip(self, specs), fields(count = specs.len()))]
	pub async fn provision(&self, specs: &[AccountSpec]) -> Vec<ProvisionResult> {
		let mut results = Vec::with_capacity(specs.len());
		for spec in specs {
			results.push(self.provision_one(spec).await);
		}

		let summary = BatchSummary::from_results(&results);
		if summary.all_succeeded() {
			info!(total = summary.total, "batch complete");
		} else {
			warn!(
				total = summary.total,
				ok = summary.ok,
				failed = summary.failed(),
				"batch complete with failures"
			);
		}

		results
	}

	/// Provision a single spec.
	#[instrument(skip(self, spec), fields(email = %spec.email, role = %spec.role()))]
	pub async fn provision_one(&self, spec: &AccountSpec) -> ProvisionResult {
		let start = Instant::now();
		let mut identity_id = None;

		let outcome = AssertUnwindSafe(self.run_steps(spec, &mut identity_id))
			.catch_unwind()
			.await
			.unwrap_or_else(|panic| {
				Err(StepFailure::new(
					ProvisionStatus::Unexpected,
					format!("panicked: {}", panic_message(panic.as_ref())),
				))
			});

		let (status, detail) = match outcome {
			Ok(()) => {
				info!(identity_id = ?identity_id, "account provisioned");
				(ProvisionStatus::Ok, None)
			}
			Err(failure) => {
				match failure.status {
					ProvisionStatus::Unexpected => {
						error!(identity_id = ?identity_id, detail = %failure.detail, "unexpected failure")
					}
					status => {
						warn!(identity_id = ?identity_id, %status, detail = %failure.detail, "provisioning failed")
					}
				}
				(failure.status, Some(failure.detail))
			}
		};

		ProvisionResult {
			spec: spec.clone(),
			status,
			identity_id,
			detail,
			elapsed: start.elapsed(),
		}
	}

	async fn run_steps(
		&self,
		spec: &AccountSpec,
		identity_id: &mut Option<String>,
	) -> Result<(), StepFailure> {
		let identity = self
			.identity
			.create_user(CreateIdentity::from(spec))
			.await
			.map_err(|e| StepFailure::new(ProvisionStatus::IdentityFailed, e.to_string()))?;
		*identity_id = Some(identity.id.clone());
		info!(identity_id = %identity.id, "identity created");

		let profile = ProfileRecord::from_identity(&identity, spec).map_err(|e| {
			StepFailure::new(
				ProvisionStatus::ProfileFailed,
				format!("inconsistent identity: {e}"),
			)
		})?;
		let row = profile.to_row().map_err(|e| {
			StepFailure::new(
				ProvisionStatus::Unexpected,
				format!("failed to serialize profile: {e}"),
			)
		})?;
		self
			.insert(&self.options.profiles_table, row)
			.await
			.map_err(|detail| StepFailure::new(ProvisionStatus::ProfileFailed, detail))?;

		if !self.options.student_records {
			return Ok(());
		}
		let Some(domain) = DomainRecord::for_profile(&profile) else {
			return Ok(());
		};

		let row = domain.to_row().map_err(|e| {
			StepFailure::new(
				ProvisionStatus::Unexpected,
				format!("failed to serialize student record: {e}"),
			)
		})?;
		self
			.insert(&self.options.students_table, row)
			.await
			.map_err(|detail| StepFailure::new(ProvisionStatus::DomainFailed, detail))?;

		Ok(())
	}

	/// Insert one row; an empty representation counts as a failure.
	async fn insert(&self, table: &str, row: Value) -> Result<(), String> {
		match self.store.insert(table, row).await {
			Ok(rows) if rows.is_empty() => Err(format!("insert into {table} returned no rows")),
			Ok(_) => Ok(()),
			Err(e) => Err(format!("insert into {table} failed: {e}")),
		}
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
	if let Some(message) = panic.downcast_ref::<&'static str>() {
		*message
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.as_str()
	} else {
		"unknown panic payload"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{FakeDataStore, FakeIdentityService};
	use enrol_provisioning_core::IdentityError;

	fn provisioner(
		identity: &Arc<FakeIdentityService>,
		store: &Arc<FakeDataStore>,
		student_records: bool,
	) -> Provisioner {
		Provisioner::new(
			identity.clone(),
			store.clone(),
			ProvisionOptions {
				student_records,
				..Default::default()
			},
		)
	}

	fn librarian() -> AccountSpec {
		AccountSpec::staff("library@aju.ng", "pw-123456", "Library Officer", "LIB001", "library")
	}

	fn test_student() -> AccountSpec {
		AccountSpec::student("test@aju.ng", "123456", "Test Student", "25/132001", None)
	}

	#[tokio::test]
	async fn staff_account_gets_one_profile() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new());

		let result = provisioner(&identity, &store, false)
			.provision_one(&librarian())
			.await;

		assert_eq!(result.status, ProvisionStatus::Ok);
		assert!(result.detail.is_none());
		let users = identity.users();
		assert_eq!(users.len(), 1);
		assert_eq!(result.identity_id.as_deref(), Some(users[0].id.as_str()));

		let profiles = store.rows_in("profiles");
		assert_eq!(profiles.len(), 1);
		assert_eq!(profiles[0]["user_id"], users[0].id.as_str());
		assert_eq!(profiles[0]["staff_id"], "LIB001");
		assert_eq!(profiles[0]["unit"], "library");
		assert!(profiles[0].get("track_no").is_none());
	}

	#[tokio::test]
	async fn student_row_written_only_when_requested() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new());

		let result = provisioner(&identity, &store, false)
			.provision_one(&test_student())
			.await;
		assert!(result.is_success());
		assert!(store.rows_in("students").is_empty());

		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new());
		let result = provisioner(&identity, &store, true)
			.provision_one(&test_student())
			.await;
		assert!(result.is_success());

		let students = store.rows_in("students");
		assert_eq!(students.len(), 1);
		assert_eq!(
			students[0],
			serde_json::json!({
				"user_id": result.identity_id.clone().unwrap(),
				"name": "Test Student",
				"track_no": "25/132001",
				"email": "test@aju.ng"
			})
		);
	}

	#[tokio::test]
	async fn staff_never_gets_student_row() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new());
		provisioner(&identity, &store, true)
			.provision_one(&librarian())
			.await;
		assert!(store.rows_in("students").is_empty());
		assert_eq!(store.calls(), 1);
	}

	#[tokio::test]
	async fn identity_failure_writes_nothing() {
		let identity = Arc::new(FakeIdentityService::new().failing_for(
			"library@aju.ng",
			IdentityError::Api {
				status: 500,
				message: "database error".to_string(),
			},
		));
		let store = Arc::new(FakeDataStore::new());

		let result = provisioner(&identity, &store, true)
			.provision_one(&librarian())
			.await;

		assert_eq!(result.status, ProvisionStatus::IdentityFailed);
		assert!(result.identity_id.is_none());
		assert!(result.detail.unwrap().contains("database error"));
		assert_eq!(store.calls(), 0);
	}

	#[tokio::test]
	async fn no_identity_returned_is_identity_failure() {
		let identity = Arc::new(
			FakeIdentityService::new().failing_for("test@aju.ng", IdentityError::NoIdentity),
		);
		let store = Arc::new(FakeDataStore::new());

		let result = provisioner(&identity, &store, true)
			.provision_one(&test_student())
			.await;
		assert_eq!(result.status, ProvisionStatus::IdentityFailed);
		assert_eq!(store.calls(), 0);
	}

	#[tokio::test]
	async fn profile_failure_keeps_identity_and_skips_student_row() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new().failing_table("profiles"));

		let result = provisioner(&identity, &store, true)
			.provision_one(&test_student())
			.await;

		assert_eq!(result.status, ProvisionStatus::ProfileFailed);
		assert!(result.identity_id.is_some());
		assert!(result.detail.unwrap().contains("profiles_pkey"));
		assert_eq!(identity.users().len(), 1);
		assert!(store.rows_in("students").is_empty());
		assert_eq!(store.calls(), 1);
	}

	#[tokio::test]
	async fn empty_profile_insert_is_profile_failure() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new().silent_table("profiles"));

		let result = provisioner(&identity, &store, false)
			.provision_one(&librarian())
			.await;
		assert_eq!(result.status, ProvisionStatus::ProfileFailed);
		assert_eq!(
			result.detail.as_deref(),
			Some("insert into profiles returned no rows")
		);
	}

	#[tokio::test]
	async fn inconsistent_metadata_is_profile_failure_without_insert() {
		let identity = Arc::new(FakeIdentityService::new().tampering(|record| {
			record.metadata.remove("role");
		}));
		let store = Arc::new(FakeDataStore::new());

		let result = provisioner(&identity, &store, false)
			.provision_one(&librarian())
			.await;

		assert_eq!(result.status, ProvisionStatus::ProfileFailed);
		assert!(result.detail.unwrap().contains("missing 'role'"));
		assert_eq!(store.calls(), 0);
	}

	#[tokio::test]
	async fn student_row_failure_is_domain_failure() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new().failing_table("students"));

		let result = provisioner(&identity, &store, true)
			.provision_one(&test_student())
			.await;

		assert_eq!(result.status, ProvisionStatus::DomainFailed);
		assert_eq!(store.rows_in("profiles").len(), 1);
		assert_eq!(identity.users().len(), 1);
	}

	#[tokio::test]
	async fn duplicate_email_second_attempt_fails() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new());

		let results = provisioner(&identity, &store, false)
			.provision(&[librarian(), librarian()])
			.await;

		assert_eq!(results.len(), 2);
		assert_eq!(results[0].status, ProvisionStatus::Ok);
		assert_eq!(results[1].status, ProvisionStatus::IdentityFailed);
		assert!(results[1].detail.as_ref().unwrap().contains("already exists"));
		assert_eq!(store.rows_in("profiles").len(), 1);
	}

	#[tokio::test]
	async fn failure_midway_does_not_stop_the_batch() {
		let specs = vec![
			AccountSpec::staff("exams@aju.ng", "pw-123456", "Exams", "EXM001", "exams"),
			AccountSpec::staff("faculty@aju.ng", "pw-123456", "Faculty", "FAC001", "faculty"),
			AccountSpec::staff("hospital@aju.ng", "pw-123456", "Hospital", "HOS001", "hospital"),
		];
		let identity = Arc::new(
			FakeIdentityService::new().failing_for("faculty@aju.ng", IdentityError::Unauthorized),
		);
		let store = Arc::new(FakeDataStore::new());

		let results = provisioner(&identity, &store, false).provision(&specs).await;

		let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
		assert_eq!(
			statuses,
			vec![
				ProvisionStatus::Ok,
				ProvisionStatus::IdentityFailed,
				ProvisionStatus::Ok
			]
		);
		let emails: Vec<_> = results.iter().map(|r| r.email()).collect();
		assert_eq!(emails, vec!["exams@aju.ng", "faculty@aju.ng", "hospital@aju.ng"]);
		assert_eq!(identity.calls(), 3);
	}

	#[tokio::test]
	async fn panic_is_contained_to_its_item() {
		let identity = Arc::new(FakeIdentityService::new().panicking_for("exams@aju.ng"));
		let store = Arc::new(FakeDataStore::new());

		let results = provisioner(&identity, &store, false)
			.provision(&[
				AccountSpec::staff("exams@aju.ng", "pw-123456", "Exams", "EXM001", "exams"),
				librarian(),
			])
			.await;

		assert_eq!(results[0].status, ProvisionStatus::Unexpected);
		assert!(results[0]
			.detail
			.as_ref()
			.unwrap()
			.contains("identity backend exploded"));
		assert_eq!(results[1].status, ProvisionStatus::Ok);
	}

	#[tokio::test]
	async fn custom_table_names_are_used() {
		let identity = Arc::new(FakeIdentityService::new());
		let store = Arc::new(FakeDataStore::new());
		let provisioner = Provisioner::new(
			identity.clone(),
			store.clone(),
			ProvisionOptions {
				profiles_table: "staging_profiles".to_string(),
				students_table: "staging_students".to_string(),
				student_records: true,
			},
		);

		provisioner.provision_one(&test_student()).await;
		assert_eq!(store.rows_in("staging_profiles").len(), 1);
		assert_eq!(store.rows_in("staging_students").len(), 1);
		assert!(store.rows_in("profiles").is_empty());
	}

	#[test]
	fn panic_message_handles_payload_types() {
		let static_str: Box<dyn Any + Send> = Box::new("boom");
		assert_eq!(panic_message(static_str.as_ref()), "boom");
		let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
		assert_eq!(panic_message(owned.as_ref()), "owned boom");
		let other: Box<dyn Any + Send> = Box::new(42_u8);
		assert_eq!(panic_message(other.as_ref()), "unknown panic payload");
	}
}
