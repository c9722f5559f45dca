//! Token endpoint request access and exchange input extraction.
//!
//! The surrounding server owns body parsing and client authentication. This module only
//! defines how the exchange reads their results: [`TokenEndpointRequest`] exposes the parsed
//! body and the principal attached under a configurable field, and [`ExchangeRequest::extract`]
//! validates both into the inputs an issuer needs.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ExchangeConfig,
	error::TokenError,
};

/// Read-only view over a token endpoint request prepared by the surrounding server.
pub trait TokenEndpointRequest {
	/// Authenticated caller identity (typically the OAuth client).
	type Principal;

	/// Principal attached under `field`, if any.
	fn principal(&self, field: &str) -> Option<&Self::Principal>;

	/// Parsed request body, or `None` when no body parser ran.
	fn body(&self) -> Option<&RequestBody>;
}

/// Parsed token endpoint body parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestBody(HashMap<String, String>);
impl RequestBody {
	/// Creates an empty body.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the parameter stored under `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Returns the parameter stored under `name` unless it is missing or empty.
	pub fn non_empty(&self, name: &str) -> Option<&str> {
		self.get(name).filter(|value| !value.is_empty())
	}

	/// Inserts or replaces a parameter.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}
}
impl<K, V> FromIterator<(K, V)> for RequestBody
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect())
	}
}

/// Owned request representation for servers that do not already have one.
#[derive(Clone, Debug)]
pub struct IncomingRequest<P> {
	/// Values attached by upstream stages, keyed by field name.
	pub attachments: HashMap<String, P>,
	/// Parsed body, if a body parser ran.
	pub body: Option<RequestBody>,
}
impl<P> IncomingRequest<P> {
	/// Creates a request with no attachments and no parsed body.
	pub fn new() -> Self {
		Self { attachments: HashMap::new(), body: None }
	}

	/// Attaches `principal` under `field`.
	pub fn with_principal(mut self, field: impl Into<String>, principal: P) -> Self {
		self.attachments.insert(field.into(), principal);

		self
	}

	/// Sets the parsed body.
	pub fn with_body(mut self, body: RequestBody) -> Self {
		self.body = Some(body);

		self
	}
}
impl<P> Default for IncomingRequest<P> {
	fn default() -> Self {
		Self::new()
	}
}
impl<P> TokenEndpointRequest for IncomingRequest<P> {
	type Principal = P;

	fn principal(&self, field: &str) -> Option<&P> {
		self.attachments.get(field)
	}

	fn body(&self) -> Option<&RequestBody> {
		self.body.as_ref()
	}
}

/// Validated exchange inputs.
#[derive(Clone, Debug)]
pub struct ExchangeRequest<P> {
	/// Authenticated caller.
	pub principal: P,
	/// Bearer token presented for exchange.
	pub token: TokenSecret,
	/// Raw requested scope; `None` when missing or empty.
	pub raw_scope: Option<String>,
}
impl<P> ExchangeRequest<P>
where
	P: Clone,
{
	/// Reads the principal, token, and raw scope from `request`.
	///
	/// Checks run in order: an unparsed body is a precondition error, a missing or empty
	/// `token` is `invalid_request`, and only then is a missing principal a precondition error.
	pub fn extract<R>(request: &R, config: &ExchangeConfig) -> Result<Self>
	where
		R: ?Sized + TokenEndpointRequest<Principal = P>,
	{
		let body = request.body().ok_or_else(Error::body_not_parsed)?;
		let token = body.non_empty("token").ok_or_else(TokenError::missing_token)?;
		let principal = request
			.principal(&config.principal_field)
			.ok_or_else(|| Error::missing_principal(&config.principal_field))?
			.clone();
		let raw_scope = body.non_empty("scope").map(str::to_owned);

		Ok(Self { principal, token: TokenSecret::new(token), raw_scope })
	}
}
