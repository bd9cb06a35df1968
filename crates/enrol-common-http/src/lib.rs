// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for enrol.
//!
//! This crate provides:
//! - A pre-configured HTTP client with a consistent User-Agent header
//! - Service-role authentication headers for the backend REST APIs
//! - Parsing of the JSON error bodies those APIs return

mod auth;
mod client;
mod error_body;

pub use auth::{with_service_role, APIKEY_HEADER};
pub use client::{builder, new_client, new_client_with_timeout, user_agent};
pub use error_body::ApiErrorBody;
