// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! PostgREST table client.
//!
//! Implements [`enrol_provisioning_core::DataStore`] over
//! `POST /rest/v1/{table}` with `Prefer: return=representation`, so every
//! insert reports the rows it actually wrote.

mod client;

pub use client::{PostgrestClient, REST_PATH};
pub use enrol_provisioning_core::validate_table_name;
