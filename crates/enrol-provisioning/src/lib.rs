// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Account provisioning for enrol.
//!
//! [`Provisioner`] walks a list of [`AccountSpec`]s one at a time: create the
//! identity, insert the profile row and, when asked, the student row. Every
//! item ends in a [`ProvisionResult`]; nothing aborts the batch.
//!
//! Seed files (`.toml` / `.json`) are loaded with [`load_seed_file`].

mod result;
pub mod seed;
mod service;

#[cfg(test)]
mod testing;

pub use enrol_provisioning_core::{AccountSpec, Role, RoleAttributes};
pub use result::{BatchSummary, ProvisionResult, ProvisionStatus};
pub use seed::{load_seed_file, parse_seed_json, parse_seed_toml, validate_specs, SeedError};
pub use service::{ProvisionOptions, Provisioner};
