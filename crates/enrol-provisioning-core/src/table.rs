// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Table names accepted by the data store.

use crate::store::StoreError;

/// Table names are interpolated into the request path, so only
/// `[A-Za-z0-9_]+` is accepted.
pub fn validate_table_name(table: &str) -> Result<(), StoreError> {
	let valid = !table.is_empty()
		&& table
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_');

	if valid {
		Ok(())
	} else {
		Err(StoreError::InvalidTable(table.to_string()))
	}
}
