//! Exchange-level error types shared by extraction, issuing, and serialization.

// std
use std::any::Any;
// crates.io
use oauth2::basic::BasicErrorResponseType;
// self
use crate::_prelude::*;

/// Exchange-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error produced by issuers and forwarded untouched.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical exchange error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The surrounding server did not prepare the request.
	#[error("{reason}")]
	Precondition {
		/// Human-readable description of the missing integration step.
		reason: String,
	},
	/// OAuth protocol failure reported back to the client.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Issuer failure forwarded without reinterpretation.
	#[error(transparent)]
	Issuer(BoxError),
	/// Issuer panicked before reaching a decision.
	#[error("{message}")]
	IssuerPanic {
		/// Panic payload rendered as text.
		message: String,
	},
	/// Token response body could not be encoded.
	#[error("Token response could not be serialized.")]
	Serialize(#[source] serde_json::Error),
	/// Token response could not be assembled from its parts.
	#[error("Token response could not be built.")]
	Response(#[source] oauth2::http::Error),
}
impl Error {
	pub(crate) const BODY_NOT_PARSED: &'static str =
		"Request body has not been parsed; install a body parser before the token endpoint.";

	/// Request body was never parsed by the surrounding server.
	pub fn body_not_parsed() -> Self {
		Self::Precondition { reason: Self::BODY_NOT_PARSED.into() }
	}

	/// No authenticated principal is attached under `field`.
	pub fn missing_principal(field: &str) -> Self {
		Self::Precondition {
			reason: format!("No authenticated principal is attached under `{field}`."),
		}
	}

	/// Converts a caught panic payload into the error channel.
	pub(crate) fn issuer_panic(payload: Box<dyn Any + Send>) -> Self {
		let message = if let Some(message) = payload.downcast_ref::<&str>() {
			(*message).to_owned()
		} else if let Some(message) = payload.downcast_ref::<String>() {
			message.clone()
		} else {
			"Issuer panicked with a non-string payload.".into()
		};

		Self::IssuerPanic { message }
	}

	/// HTTP status imposed by this crate, if any.
	///
	/// Only [`Error::Token`] carries a status; issuer failures are passed through without one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Token(e) => Some(e.status),
			_ => None,
		}
	}

	/// OAuth error code (`invalid_request`, `invalid_grant`, ...) for protocol failures.
	pub fn code(&self) -> Option<&str> {
		match self {
			Self::Token(e) => Some(e.code()),
			_ => None,
		}
	}
}

/// Configuration failures raised while constructing a handler.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No decision function was supplied.
	#[error("The redelegate exchange requires an issue callback.")]
	MissingIssuer,
	/// Principal field name is empty.
	#[error("Principal field name cannot be empty.")]
	EmptyPrincipalField,
	/// Scope separator list is empty.
	#[error("At least one scope separator is required.")]
	NoScopeSeparators,
	/// A scope separator is the empty string.
	#[error("Scope separators cannot be empty strings.")]
	EmptyScopeSeparator,
	/// Configuration document could not be parsed.
	#[error("Exchange configuration is malformed.")]
	Parse {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// OAuth 2.0 token endpoint error carrying the protocol code and HTTP status.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{description}")]
pub struct TokenError {
	/// Standard OAuth error code.
	pub kind: BasicErrorResponseType,
	/// HTTP status to answer with.
	pub status: u16,
	/// Human-readable description.
	pub description: String,
}
impl TokenError {
	/// Creates a new token error.
	pub fn new(kind: BasicErrorResponseType, status: u16, description: impl Into<String>) -> Self {
		Self { kind, status, description: description.into() }
	}

	/// The `token` body parameter is missing or empty.
	pub fn missing_token() -> Self {
		Self::new(BasicErrorResponseType::InvalidRequest, 400, "Missing required parameter: token")
	}

	/// The issuer declined to issue a derivative token.
	pub fn invalid_token() -> Self {
		Self::new(BasicErrorResponseType::InvalidGrant, 403, "Invalid token")
	}

	/// Returns the OAuth error code string.
	pub fn code(&self) -> &str {
		self.kind.as_ref()
	}
}
