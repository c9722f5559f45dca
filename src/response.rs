//! Token response serialization.
//!
//! Key order is part of the response contract: `access_token` first, then the issuer's extra
//! parameters in the order supplied, then `token_type` only when the issuer did not provide
//! one. The body is built as an explicit ordered entry list so the order never depends on
//! map implementation details.

// crates.io
use oauth2::http::{
	Response, StatusCode,
	header::{CACHE_CONTROL, CONTENT_TYPE, HeaderValue, PRAGMA},
};
use serde::{Serializer, ser::SerializeMap};
// self
use crate::{
	_prelude::*,
	auth::{DEFAULT_TOKEN_TYPE, IssuedToken, is_falsy},
};

/// HTTP response produced by a successful exchange.
pub type TokenResponse = Response<String>;

/// Ordered JSON object written as the token response body.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenResponseBody(Vec<(String, Value)>);
impl TokenResponseBody {
	/// Builds the body for an issued token.
	///
	/// Extra parameters are merged like object assignment: a key already present keeps its
	/// position and takes the new value. A `token_type` parameter that is null, false, zero,
	/// or empty is replaced in place by the default.
	pub fn new(issued: &IssuedToken) -> Self {
		let mut entries =
			vec![("access_token".to_owned(), Value::from(issued.access_token.expose()))];

		for (key, value) in issued.params.iter() {
			match entries.iter_mut().find(|(existing, _)| existing == key) {
				Some((_, slot)) => *slot = value.clone(),
				None => entries.push((key.to_owned(), value.clone())),
			}
		}

		match entries.iter_mut().find(|(key, _)| key == "token_type") {
			Some((_, value)) if is_falsy(value) => *value = Value::from(DEFAULT_TOKEN_TYPE),
			Some(_) => {},
			None => entries.push(("token_type".to_owned(), Value::from(DEFAULT_TOKEN_TYPE))),
		}

		Self(entries)
	}

	/// Keys in serialization order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(key, _)| key.as_str())
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
	}

	/// Serializes the body to a compact JSON string.
	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string(self).map_err(Error::Serialize)
	}

	/// Wraps the body in a `200 OK` response with the no-cache headers token endpoints require.
	pub fn into_response(self) -> Result<TokenResponse> {
		let json = self.to_json()?;
		let response = Response::builder()
			.status(StatusCode::OK)
			.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
			.header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
			.header(PRAGMA, HeaderValue::from_static("no-cache"))
			.body(json)
			.map_err(Error::Response)?;

		Ok(response)
	}
}
impl From<&IssuedToken> for TokenResponseBody {
	fn from(issued: &IssuedToken) -> Self {
		Self::new(issued)
	}
}
impl Serialize for TokenResponseBody {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.0.len()))?;

		for (key, value) in &self.0 {
			map.serialize_entry(key, value)?;
		}

		map.end()
	}
}
