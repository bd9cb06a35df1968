// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use enrol_common_secret::SecretString;
use reqwest::RequestBuilder;

/// Header carrying the project API key on every backend request.
pub const APIKEY_HEADER: &str = "apikey";

/// Attach the service-role key as both the `apikey` header and a bearer token.
///
/// The identity admin API and the table API both require the pair; sending
/// only one of them is rejected with 401.
pub fn with_service_role(request: RequestBuilder, key: &SecretString) -> RequestBuilder {
	request
		.header(APIKEY_HEADER, key.expose().as_str())
		.bearer_auth(key.expose())
}
