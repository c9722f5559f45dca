//! Scope tokenization helpers used by the exchange.

// std
use std::{slice::Iter, sync::OnceLock};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use serde::{Deserializer, Serializer, ser::SerializeSeq};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, error::ConfigError};

/// Ordered list of requested scopes, exactly as the client separated them.
///
/// Unlike a normalized scope set, the list keeps the client's order and does not
/// trim or deduplicate entries; issuers receive what was sent. A tokenized list always
/// holds at least one entry. The [`fingerprint`](Self::fingerprint) helper lazily caches a
/// base64 (no padding) SHA-256 digest of the space-joined list for log correlation.
pub struct ScopeList {
	scopes: Arc<[String]>,
	fingerprint_cache: OnceLock<String>,
}
impl ScopeList {
	/// Splits `raw` on the first separator (in priority order) that yields more than one segment.
	///
	/// When no separator matches, the list holds `raw` unmodified as its single entry.
	pub fn tokenize(raw: &str, separators: &ScopeSeparators) -> Self {
		let scopes = separators
			.iter()
			.map(|separator| raw.split(separator).map(str::to_owned).collect::<Vec<_>>())
			.find(|segments| segments.len() > 1)
			.unwrap_or_else(|| vec![raw.to_owned()]);

		Self { scopes: Arc::from(scopes), fingerprint_cache: OnceLock::new() }
	}

	/// Number of scope entries.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if the list holds no entries.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scope entries in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.scopes
	}

	/// Stable fingerprint derived from the space-joined list, cached after first use.
	pub fn fingerprint(&self) -> String {
		self.fingerprint_cache.get_or_init(|| compute_fingerprint(&self.scopes)).clone()
	}
}
impl Clone for ScopeList {
	fn clone(&self) -> Self {
		Self { scopes: self.scopes.clone(), fingerprint_cache: OnceLock::new() }
	}
}
impl PartialEq for ScopeList {
	fn eq(&self, other: &Self) -> bool {
		self.scopes == other.scopes
	}
}
impl Eq for ScopeList {}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.scopes).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.scopes.join(" "))
	}
}
impl<S> PartialEq<[S]> for ScopeList
where
	S: AsRef<str>,
{
	fn eq(&self, other: &[S]) -> bool {
		self.scopes.len() == other.len()
			&& self.scopes.iter().zip(other).all(|(lhs, rhs)| lhs == rhs.as_ref())
	}
}
impl<S, const N: usize> PartialEq<[S; N]> for ScopeList
where
	S: AsRef<str>,
{
	fn eq(&self, other: &[S; N]) -> bool {
		self == other.as_slice()
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.scopes.iter() }
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in self.scopes.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}

/// Priority-ordered scope separator candidates.
///
/// Configuration accepts either a bare string or a list; a bare string becomes a
/// one-element list. Earlier entries win, so `[" ", ","]` prefers spaces and only falls
/// back to commas when the scope contains no space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeSeparators(Vec<String>);
impl ScopeSeparators {
	/// Builds a validated separator list.
	pub fn new<I, S>(separators: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let separators = Self(separators.into_iter().map(Into::into).collect());

		separators.validate()?;

		Ok(separators)
	}

	/// Ensures the list is non-empty and free of empty separators.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.0.is_empty() {
			return Err(ConfigError::NoScopeSeparators);
		}
		if self.0.iter().any(String::is_empty) {
			return Err(ConfigError::EmptyScopeSeparator);
		}

		Ok(())
	}

	/// Iterator over separators in priority order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Returns the separators as a slice.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Default for ScopeSeparators {
	fn default() -> Self {
		Self(vec![" ".into()])
	}
}
impl From<&str> for ScopeSeparators {
	fn from(value: &str) -> Self {
		Self(vec![value.into()])
	}
}
impl From<String> for ScopeSeparators {
	fn from(value: String) -> Self {
		Self(vec![value])
	}
}
impl From<Vec<String>> for ScopeSeparators {
	fn from(value: Vec<String>) -> Self {
		Self(value)
	}
}
impl Serialize for ScopeSeparators {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.0.serialize(serializer)
	}
}
impl<'de> Deserialize<'de> for ScopeSeparators {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum OneOrMany {
			One(String),
			Many(Vec<String>),
		}

		Ok(match OneOrMany::deserialize(deserializer)? {
			OneOrMany::One(separator) => separator.into(),
			OneOrMany::Many(separators) => separators.into(),
		})
	}
}

fn compute_fingerprint(scopes: &[String]) -> String {
	let joined = scopes.join(" ");
	let mut hasher = Sha256::new();

	hasher.update(joined.as_bytes());

	let digest = hasher.finalize();

	STANDARD_NO_PAD.encode(digest)
}
