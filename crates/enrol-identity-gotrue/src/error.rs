// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Mapping of HTTP failures onto [`IdentityError`].

use enrol_common_http::ApiErrorBody;
use enrol_provisioning_core::IdentityError;
use tracing::error;

/// Phrases and codes the admin API uses for a duplicate address.
const ALREADY_EXISTS_MARKERS: &[&str] = &[
	"email_exists",
	"user_already_exists",
	"already been registered",
	"already exists",
];

pub(crate) fn from_transport(e: reqwest::Error) -> IdentityError {
	if e.is_timeout() {
		error!("identity request timed out");
		return IdentityError::Timeout;
	}
	error!(error = %e, "network error during identity request");
	IdentityError::Transport(e.to_string())
}

pub(crate) fn from_status(status: u16, body: &str, email: &str) -> IdentityError {
	let parsed = ApiErrorBody::parse(body);

	match status {
		401 | 403 => {
			error!(status, "identity service rejected the service-role key");
			IdentityError::Unauthorized
		}
		409 | 422
			if ALREADY_EXISTS_MARKERS
				.iter()
				.any(|marker| parsed.mentions(marker)) =>
		{
			IdentityError::AlreadyExists {
				email: email.to_string(),
			}
		}
		_ => {
			let message = parsed.message();
			error!(status, code = ?parsed.code(), message = %message, "identity API error");
			IdentityError::Api { status, message }
		}
	}
}
