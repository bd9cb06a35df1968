// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory identity service and data store for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use enrol_provisioning_core::{
	CreateIdentity, DataStore, IdentityError, IdentityRecord, IdentityService, StoreError,
};
use serde_json::Value;

type Tamper = Box<dyn Fn(&mut IdentityRecord) + Send + Sync>;

/// Identity service that enforces email uniqueness like the real one.
#[derive(Default)]
pub(crate) struct FakeIdentityService {
	users: Mutex<Vec<IdentityRecord>>,
	failures: HashMap<String, IdentityError>,
	panics: HashSet<String>,
	tamper: Option<Tamper>,
	calls: AtomicUsize,
}

impl FakeIdentityService {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn failing_for(mut self, email: &str, error: IdentityError) -> Self {
		self.failures.insert(email.to_string(), error);
		self
	}

	pub(crate) fn panicking_for(mut self, email: &str) -> Self {
		self.panics.insert(email.to_string());
		self
	}

	/// Alter every echoed record before it is returned.
	pub(crate) fn tampering(
		mut self,
		tamper: impl Fn(&mut IdentityRecord) + Send + Sync + 'static,
	) -> Self {
		self.tamper = Some(Box::new(tamper));
		self
	}

	pub(crate) fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub(crate) fn users(&self) -> Vec<IdentityRecord> {
		self.users.lock().unwrap().clone()
	}
}

#[async_trait]
impl IdentityService for FakeIdentityService {
	async fn create_user(&self, request: CreateIdentity) -> Result<IdentityRecord, IdentityError> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		if self.panics.contains(&request.email) {
			panic!("identity backend exploded for {}", request.email);
		}
		if let Some(error) = self.failures.get(&request.email) {
			return Err(error.clone());
		}

		let mut users = self.users.lock().unwrap();
		let taken = users.iter().any(|u| {
			u.email
				.as_deref()
				.is_some_and(|e| e.eq_ignore_ascii_case(&request.email))
		});
		if taken {
			return Err(IdentityError::AlreadyExists {
				email: request.email,
			});
		}

		let record = IdentityRecord {
			id: uuid::Uuid::new_v4().to_string(),
			email: Some(request.email.to_lowercase()),
			metadata: request.metadata,
		};
		users.push(record.clone());

		let mut echoed = record;
		if let Some(tamper) = &self.tamper {
			tamper(&mut echoed);
		}
		Ok(echoed)
	}
}

/// Data store that keeps inserted rows per table.
#[derive(Default)]
pub(crate) struct FakeDataStore {
	rows: Mutex<Vec<(String, Value)>>,
	failing: HashSet<String>,
	silent: HashSet<String>,
	calls: AtomicUsize,
}

impl FakeDataStore {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Every insert into `table` fails with a constraint error.
	pub(crate) fn failing_table(mut self, table: &str) -> Self {
		self.failing.insert(table.to_string());
		self
	}

	/// Inserts into `table` succeed but report no rows.
	pub(crate) fn silent_table(mut self, table: &str) -> Self {
		self.silent.insert(table.to_string());
		self
	}

	pub(crate) fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub(crate) fn rows_in(&self, table: &str) -> Vec<Value> {
		self.rows
			.lock()
			.unwrap()
			.iter()
			.filter(|(t, _)| t == table)
			.map(|(_, row)| row.clone())
			.collect()
	}
}

#[async_trait]
impl DataStore for FakeDataStore {
	async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		if self.failing.contains(table) {
			return Err(StoreError::Api {
				status: 409,
				code: Some("23505".to_string()),
				message: format!("duplicate key value violates unique constraint \"{table}_pkey\""),
			});
		}
		if self.silent.contains(table) {
			return Ok(Vec::new());
		}

		self.rows
			.lock()
			.unwrap()
			.push((table.to_string(), row.clone()));
		Ok(vec![row])
	}
}
