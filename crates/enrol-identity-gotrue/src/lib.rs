// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GoTrue admin API client.
//!
//! Implements [`enrol_provisioning_core::IdentityService`] by calling
//! `POST /auth/v1/admin/users` with the project's service-role key.
//!
//! # Example
//!
//! ```ignore
//! use enrol_identity_gotrue::GoTrueClient;
//!
//! let client = GoTrueClient::new("https://project.supabase.co", key)?;
//! let identity = client.create_user(request).await?;
//! ```

mod client;
mod error;

pub use client::{GoTrueClient, ADMIN_USERS_PATH};
