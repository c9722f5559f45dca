//! Immutable exchange configuration and its builder.

// self
use crate::{_prelude::*, auth::ScopeSeparators, error::ConfigError};

/// Per-handler configuration fixed at construction.
///
/// JSON documents use the keys `principal_field` and `scope_separator`; the latter accepts a
/// bare string or a priority-ordered list of strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeConfig {
	/// Request field holding the authenticated principal (the OAuth client).
	pub principal_field: String,
	/// Priority-ordered scope separator candidates.
	#[serde(rename = "scope_separator")]
	pub separators: ScopeSeparators,
}
impl ExchangeConfig {
	/// Default request field for the authenticated principal.
	pub const DEFAULT_PRINCIPAL_FIELD: &'static str = "user";

	/// Returns a builder seeded with defaults.
	pub fn builder() -> ExchangeConfigBuilder {
		ExchangeConfigBuilder::default()
	}

	/// Parses and validates a JSON configuration document.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(json);
		let config: Self = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Checks the configuration invariants.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.principal_field.is_empty() {
			return Err(ConfigError::EmptyPrincipalField);
		}

		self.separators.validate()
	}
}
impl Default for ExchangeConfig {
	fn default() -> Self {
		Self {
			principal_field: Self::DEFAULT_PRINCIPAL_FIELD.into(),
			separators: ScopeSeparators::default(),
		}
	}
}
impl FromStr for ExchangeConfig {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_json_str(s)
	}
}

/// Builder for [`ExchangeConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct ExchangeConfigBuilder {
	/// Configuration under construction.
	pub config: ExchangeConfig,
}
impl ExchangeConfigBuilder {
	/// Sets the request field holding the authenticated principal.
	pub fn principal_field(mut self, field: impl Into<String>) -> Self {
		self.config.principal_field = field.into();

		self
	}

	/// Uses a single scope separator.
	pub fn scope_separator(mut self, separator: impl Into<String>) -> Self {
		self.config.separators = ScopeSeparators::from(separator.into());

		self
	}

	/// Uses a priority-ordered list of scope separators.
	pub fn scope_separators<I, S>(mut self, separators: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.config.separators =
			ScopeSeparators::from(separators.into_iter().map(Into::into).collect::<Vec<_>>());

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<ExchangeConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_token_endpoint_conventions() {
		let config = ExchangeConfig::default();

		assert_eq!(config.principal_field, "user");
		assert_eq!(config.separators.iter().collect::<Vec<_>>(), vec![" "]);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn json_accepts_bare_or_listed_separators() {
		let single = ExchangeConfig::from_json_str(r#"{"scope_separator":","}"#)
			.expect("Bare separator config should parse.");
		let listed = ExchangeConfig::from_json_str(
			r#"{"principal_field":"client","scope_separator":[" ",","]}"#,
		)
		.expect("Listed separator config should parse.");

		assert_eq!(single.principal_field, "user");
		assert_eq!(single.separators.iter().collect::<Vec<_>>(), vec![","]);
		assert_eq!(listed.principal_field, "client");
		assert_eq!(listed.separators.iter().collect::<Vec<_>>(), vec![" ", ","]);
	}

	#[test]
	fn json_errors_report_the_offending_path() {
		let err = ExchangeConfig::from_json_str(r#"{"principal_field":7}"#)
			.expect_err("Numeric principal field must be rejected.");

		match err {
			ConfigError::Parse { source } =>
				assert_eq!(source.path().to_string(), "principal_field"),
			other => panic!("Expected a parse error, got {other:?}."),
		}

		assert!(ExchangeConfig::from_json_str(r#"{"unknown":true}"#).is_err());
	}

	#[test]
	fn invalid_values_are_rejected() {
		assert!(matches!(
			ExchangeConfig::from_json_str(r#"{"scope_separator":[]}"#),
			Err(ConfigError::NoScopeSeparators)
		));
		assert!(matches!(
			ExchangeConfig::builder().scope_separator("").build(),
			Err(ConfigError::EmptyScopeSeparator)
		));
		assert!(matches!(
			ExchangeConfig::builder().principal_field("").build(),
			Err(ConfigError::EmptyPrincipalField)
		));
	}

	#[test]
	fn builder_sets_every_option() {
		let config = ExchangeConfig::builder()
			.principal_field("client")
			.scope_separators([" ", ","])
			.build()
			.expect("Builder config should be valid.");

		assert_eq!(config.principal_field, "client");
		assert_eq!(config.separators.iter().collect::<Vec<_>>(), vec![" ", ","]);
	}
}
