//! Transport primitives for API and token calls.
//!
//! The module exposes [`ApiHttpClient`], the client's only dependency on an HTTP stack.
//! Requests and responses use the `http` types re-exported by `oauth2`
//! ([`HttpRequest`], [`HttpResponse`]) so downstream crates can integrate custom HTTP
//! clients without pulling in reqwest. Transport failures are reported as
//! [`HttpClientError`] and mapped into the client's [`TransportError`] taxonomy by
//! [`map_transport_error`].

pub use oauth2::{HttpClientError, HttpRequest, HttpResponse};

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API and token requests.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared behind an `Arc`
/// across cloned clients, and the futures they return must be `Send` so callers can
/// spawn client calls onto multi-threaded executors. Implementations must not follow
/// redirects on the token endpoint and must return non-success responses as
/// `Ok(HttpResponse)`; only failures without a response belong in the error branch.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves with the full response, whatever its status.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Converts an [`HttpClientError`] emitted by a transport into a client error.
pub fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::Network { source: inner }.into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unrecognized transport failure".into() }.into(),
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects, matching OAuth 2.0 guidance that token
	/// endpoints answer directly.
	pub fn no_redirects() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug)]
	struct Refused;
	impl Display for Refused {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("connection refused")
		}
	}
	impl StdError for Refused {}

	#[test]
	fn transport_errors_map_into_client_taxonomy() {
		let network = map_transport_error(HttpClientError::Reqwest(Box::new(Refused)));
		let other = map_transport_error::<Refused>(HttpClientError::Other("closed".into()));
		let io = map_transport_error::<Refused>(HttpClientError::Io(std::io::Error::other("eof")));

		assert!(matches!(network, Error::Transport(TransportError::Network { .. })));
		assert!(matches!(
			other,
			Error::Transport(TransportError::Other { ref message }) if message == "closed"
		));
		assert!(matches!(io, Error::Transport(TransportError::Io(_))));
	}
}
