// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Table store abstraction.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when inserting rows.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
	#[error("invalid table name '{0}'")]
	InvalidTable(String),

	#[error("data store rejected the service-role key")]
	Unauthorized,

	#[error("insert request timed out")]
	Timeout,

	#[error("transport error: {0}")]
	Transport(String),

	#[error("data store error: {status}{} - {message}", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
	Api {
		status: u16,
		code: Option<String>,
		message: String,
	},

	#[error("invalid response from data store: {0}")]
	InvalidResponse(String),
}

/// Inserts rows into named tables of an external store.
#[async_trait]
pub trait DataStore: Send + Sync {
	/// Insert one row and return the rows the store reports as inserted.
	async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError>;
}
