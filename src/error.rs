//! Client-level error types shared across the dispatcher, token provider, and catalog.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token exchange failed.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Caller arguments do not satisfy the operation descriptor.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Successful response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Operation name is not registered in the catalog.
	#[error("Operation `{name}` is not registered in the catalog.")]
	UnknownOperation {
		/// Requested operation name.
		name: String,
	},
	/// API answered an operation call with a non-200 status.
	#[error("API request failed with status {status}: {message}.")]
	Api {
		/// Upstream `statusMessage`, or `Unknown error` when absent.
		message: String,
		/// HTTP status code.
		status: u16,
	},
}
impl Error {
	/// Returns the HTTP status associated with the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			Self::Authentication(e) => e.status(),
			Self::Decode(e) => Some(e.status),
			_ => None,
		}
	}
}

/// Configuration and request-construction failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint URL cannot be parsed or joined.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS outside of loopback hosts.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Operation descriptor or catalog failed validation.
	#[error(transparent)]
	Catalog(#[from] crate::catalog::CatalogError),
	/// Request arguments could not be serialized into a JSON body.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token exchange failures.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Token endpoint rejected the credentials or answered with a non-success status.
	#[error("Token endpoint rejected the request with status {status}: {message}.")]
	Rejected {
		/// Upstream error text.
		message: String,
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint responded with a body that could not be parsed.
	#[error("Token endpoint returned a malformed response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn {
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint returned a non-positive or out-of-range `expires_in`.
	#[error("Token endpoint returned an unusable expires_in value: {value}.")]
	InvalidExpiresIn {
		/// Raw value returned by the endpoint.
		value: String,
		/// HTTP status code.
		status: u16,
	},
}
impl AuthenticationError {
	/// Returns the HTTP status reported by the token endpoint.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::MissingExpiresIn { status }
			| Self::InvalidExpiresIn { status, .. } => Some(*status),
		}
	}
}

/// Argument validation failures raised before any network call.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required parameter was absent or `null`.
	#[error("Operation `{operation}` requires the `{parameter}` parameter.")]
	MissingParameter {
		/// Operation name.
		operation: String,
		/// Missing parameter name.
		parameter: String,
	},
	/// A parameter value does not match the declared kind.
	#[error("Parameter `{parameter}` of operation `{operation}` must be {expected}.")]
	InvalidType {
		/// Operation name.
		operation: String,
		/// Offending parameter name.
		parameter: String,
		/// Declared kind label.
		expected: &'static str,
	},
}

/// Failure to decode a successful response body.
#[derive(Debug, ThisError)]
#[error("Response body with status {status} could not be decoded.")]
pub struct DecodeError {
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code.
	pub status: u16,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a typed error.
	#[error("HTTP client error occurred while calling the API: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_is_exposed_for_api_and_auth_failures() {
		let api = Error::Api { message: "invalid cif".into(), status: 401 };
		let auth: Error =
			AuthenticationError::Rejected { message: "bad secret".into(), status: 400 }.into();
		let unknown = Error::UnknownOperation { name: "getNothing".into() };

		assert_eq!(api.status(), Some(401));
		assert_eq!(auth.status(), Some(400));
		assert_eq!(unknown.status(), None);
		assert_eq!(api.to_string(), "API request failed with status 401: invalid cif.");
	}

	#[test]
	fn validation_error_names_the_parameter() {
		let err = ValidationError::MissingParameter {
			operation: "getClients".into(),
			parameter: "cif".into(),
		};

		assert_eq!(err.to_string(), "Operation `getClients` requires the `cif` parameter.");
	}
}
