// self
use crate::{
	_prelude::*,
	auth::ScopeSeparators,
	config::ExchangeConfig,
	error::ConfigError,
	exchange::Redelegate,
	issuer::{Issuer, ScopedIssue, UnscopedIssue},
};

/// Builder for [`Redelegate`] handlers.
///
/// [`build`](Self::build) fails with [`ConfigError::MissingIssuer`] when no issuer was
/// supplied, before any request can reach the handler.
pub struct RedelegateBuilder<P> {
	/// Configuration under construction.
	pub config: ExchangeConfig,
	/// Issuer, once supplied.
	pub issuer: Option<Issuer<P>>,
}
impl<P> RedelegateBuilder<P>
where
	P: 'static + Clone + Send,
{
	/// Replaces the whole configuration.
	pub fn config(mut self, config: ExchangeConfig) -> Self {
		self.config = config;

		self
	}

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

	/// Sets the issuer.
	pub fn issuer(mut self, issuer: Issuer<P>) -> Self {
		self.issuer = Some(issuer);

		self
	}

	/// Sets a scope-aware issuer.
	pub fn scope_aware(self, issue: impl 'static + ScopedIssue<P>) -> Self {
		self.issuer(Issuer::scope_aware(issue))
	}

	/// Sets a scope-oblivious issuer.
	pub fn scope_oblivious(self, issue: impl 'static + UnscopedIssue<P>) -> Self {
		self.issuer(Issuer::scope_oblivious(issue))
	}

	/// Validates the configuration and builds the handler.
	pub fn build(self) -> Result<Redelegate<P>, ConfigError> {
		let issuer = self.issuer.ok_or(ConfigError::MissingIssuer)?;

		self.config.validate()?;

		Ok(Redelegate { config: Arc::new(self.config), issuer })
	}
}
impl<P> Default for RedelegateBuilder<P> {
	fn default() -> Self {
		Self { config: ExchangeConfig::default(), issuer: None }
	}
}
impl<P> Debug for RedelegateBuilder<P> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RedelegateBuilder")
			.field("config", &self.config)
			.field("issuer", &self.issuer)
			.finish()
	}
}
