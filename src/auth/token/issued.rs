//! Issued token model returned by issuers.

// std
use std::{borrow::Cow, slice::Iter, vec::IntoIter};
// crates.io
use serde::{Serializer, ser::SerializeMap};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Token type reported when the issuer does not provide one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Derivative token produced by an issuer.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedToken {
	/// Access token handed back to the client.
	pub access_token: TokenSecret,
	/// Additional response parameters in issuer order.
	pub params: TokenParams,
}
impl IssuedToken {
	/// Creates an issued token without extra parameters.
	pub fn new(access_token: impl Into<TokenSecret>) -> Self {
		Self { access_token: access_token.into(), params: TokenParams::default() }
	}

	/// Attaches extra response parameters.
	pub fn with_params(mut self, params: TokenParams) -> Self {
		self.params = params;

		self
	}

	/// Token type the response will advertise.
	///
	/// An issuer value is kept unless it is falsy (see [`is_falsy`]); otherwise the result is
	/// [`DEFAULT_TOKEN_TYPE`].
	pub fn token_type(&self) -> Cow<'_, Value> {
		match self.params.get("token_type") {
			Some(token_type) if !is_falsy(token_type) => Cow::Borrowed(token_type),
			_ => Cow::Owned(Value::from(DEFAULT_TOKEN_TYPE)),
		}
	}
}

/// Returns true for the values a token response treats as unset: null, false, zero, NaN, and
/// the empty string.
pub fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0 || n.is_nan()),
		Value::String(text) => text.is_empty(),
		Value::Array(_) | Value::Object(_) => false,
	}
}

/// Insertion-ordered response parameters (`expires_in`, `refresh_token`, ...).
///
/// Inserting an existing key replaces its value in place, so the first insertion decides
/// where the key appears in the serialized response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenParams(Vec<(String, Value)>);
impl TokenParams {
	/// Creates an empty parameter list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces a parameter, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		let key = key.into();
		let value = value.into();

		match self.0.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.0.push((key, value));

				None
			},
		}
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);

		self
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no parameters are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over parameters in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Iterator over keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(key, _)| key.as_str())
	}
}
impl<K, V> FromIterator<(K, V)> for TokenParams
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut params = Self::new();

		for (key, value) in iter {
			params.insert(key, value);
		}

		params
	}
}
impl<K, V> Extend<(K, V)> for TokenParams
where
	K: Into<String>,
	V: Into<Value>,
{
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = (K, V)>,
	{
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}
impl IntoIterator for TokenParams {
	type IntoIter = IntoIter<(String, Value)>;
	type Item = (String, Value);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
impl<'a> IntoIterator for &'a TokenParams {
	type IntoIter = Iter<'a, (String, Value)>;
	type Item = &'a (String, Value);

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl Serialize for TokenParams {
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
