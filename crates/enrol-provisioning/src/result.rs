// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::time::Duration;

use enrol_provisioning_core::AccountSpec;
use serde::Serialize;

/// Outcome of provisioning one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStatus {
	Ok,
	/// No identity was created; nothing else was written.
	IdentityFailed,
	/// The identity exists but its profile row does not.
	ProfileFailed,
	/// Identity and profile exist; the role-specific row does not.
	DomainFailed,
	/// A panic or serialization failure while handling the item.
	Unexpected,
}

impl ProvisionStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Ok => "ok",
			Self::IdentityFailed => "identity_failed",
			Self::ProfileFailed => "profile_failed",
			Self::DomainFailed => "domain_failed",
			Self::Unexpected => "unexpected",
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Ok)
	}
}

impl fmt::Display for ProvisionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What happened to one [`AccountSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionResult {
	pub spec: AccountSpec,
	pub status: ProvisionStatus,
	/// Set as soon as the identity service issued an id, even if a later
	/// step failed.
	pub identity_id: Option<String>,
	pub detail: Option<String>,
	pub elapsed: Duration,
}

impl ProvisionResult {
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	pub fn email(&self) -> &str {
		&self.spec.email
	}
}

/// Counts over a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
	pub total: usize,
	pub ok: usize,
	pub identity_failed: usize,
	pub profile_failed: usize,
	pub domain_failed: usize,
	pub unexpected: usize,
	pub elapsed: Duration,
}

impl BatchSummary {
	pub fn from_results(results: &[ProvisionResult]) -> Self {
		let mut summary = Self::default();
		for result in results {
			summary.total += 1;
			summary.elapsed += result.elapsed;
			match result.status {
				ProvisionStatus::Ok => summary.ok += 1,
				ProvisionStatus::IdentityFailed => summary.identity_failed += 1,
				ProvisionStatus::ProfileFailed => summary.profile_failed += 1,
				ProvisionStatus::DomainFailed => summary.domain_failed += 1,
				ProvisionStatus::Unexpected => summary.unexpected += 1,
			}
		}
		summary
	}

	pub fn failed(&self) -> usize {
		self.total - self.ok
	}

	/// True for an empty batch too.
	pub fn all_succeeded(&self) -> bool {
		self.ok == self.total
	}
}

impl fmt::Display for BatchSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} account(s) processed: {} ok, {} failed",
			self.total,
			self.ok,
			self.failed()
		)?;

		let breakdown: Vec<String> = [
			(ProvisionStatus::IdentityFailed, self.identity_failed),
			(ProvisionStatus::ProfileFailed, self.profile_failed),
			(ProvisionStatus::DomainFailed, self.domain_failed),
			(ProvisionStatus::Unexpected, self.unexpected),
		]
		.into_iter()
		.filter(|(_, count)| *count > 0)
		.map(|(status, count)| format!("{status}: {count}"))
		.collect();

		if !breakdown.is_empty() {
			write!(f, " ({})", breakdown.join(", "))?;
		}
		Ok(())
	}
}
