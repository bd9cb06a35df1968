// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Core types for account provisioning.
//!
//! - [`AccountSpec`]: one account to create, with role-specific attributes
//! - [`IdentityService`] / [`DataStore`]: the two external collaborators
//! - [`ProfileRecord`] / [`DomainRecord`]: rows derived from a created identity

pub mod account;
pub mod identity;
pub mod records;
pub mod store;
pub mod table;

pub use account::{AccountSpec, Role, RoleAttributes};
pub use identity::{CreateIdentity, IdentityError, IdentityRecord, IdentityService, Metadata};
pub use records::{DomainRecord, ProfileRecord, ProfileValidationError, StudentRecord};
pub use store::{DataStore, StoreError};
pub use table::validate_table_name;
