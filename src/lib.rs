//! OAuth 2.0 bearer token redelegation for Rust token endpoints—hand an authenticated client's
//! token to a pluggable issuer and answer with a narrower, derivative access token.
//!
//! The crate implements a single token exchange grant. Body parsing, client authentication,
//! routing, and token storage stay with the surrounding server; [`exchange::Redelegate`] only
//! reads the parsed request, asks an [`issuer::Issuer`] for a decision, and serializes the
//! resulting token response.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod exchange;
pub mod issuer;
pub mod obs;
pub mod request;
pub mod response;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		exchange::Redelegate,
		issuer::{IssueDecision, IssueResult},
		request::{IncomingRequest, RequestBody},
	};

	/// Authenticated OAuth client used as the principal in tests.
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct TestClient {
		/// Client identifier.
		pub id: String,
	}
	impl TestClient {
		/// Creates a client fixture with the provided identifier.
		pub fn new(id: impl Into<String>) -> Self {
			Self { id: id.into() }
		}
	}

	/// Handler type alias used by tests.
	pub type TestRedelegate = Redelegate<TestClient>;

	/// Builds a request with `client` attached under `field` and a parsed body made of `fields`.
	pub fn test_request<'a>(
		field: &str,
		client: TestClient,
		fields: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> IncomingRequest<TestClient> {
		IncomingRequest::new()
			.with_principal(field, client)
			.with_body(RequestBody::from_iter(fields))
	}

	/// Issues `access_token` to any caller.
	pub async fn issue_fixed(access_token: &'static str) -> IssueResult {
		Ok(IssueDecision::issue(access_token))
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(test)] use color_eyre as _;
