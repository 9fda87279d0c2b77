//! Async client for the Oblio invoicing API: a declarative operation catalog, cached
//! client-credentials tokens with singleflight refresh, and normalized JSON results.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;
pub mod ext;
pub mod http;
pub mod nomenclator;
pub mod obs;
pub mod response;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{Client, ClientBuilder},
		http::ReqwestHttpClient,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns a builder pointed at a mock server's `/api/` root, using the insecure test
	/// transport.
	pub fn test_client_builder(
		api_root: &str,
		client_id: &str,
		client_secret: &str,
	) -> ClientBuilder<ReqwestHttpClient> {
		let base = Url::parse(api_root).expect("Mock API root should parse successfully.");

		Client::builder(client_id, client_secret)
			.base_url(base)
			.http_client::<ReqwestHttpClient>(test_reqwest_http_client())
	}

	/// Constructs a [`Client`] against a mock server's `/api/` root.
	pub fn build_reqwest_test_client(
		api_root: &str,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestTestClient {
		test_client_builder(api_root, client_id, client_secret)
			.build()
			.expect("Test client should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use color_eyre as _;
#[cfg(all(test, not(feature = "reqwest")))] use httpmock as _;

pub use crate::{
	client::{Arguments, Client, ClientBuilder},
	error::{Error, Result},
	response::{ApiResponse, ContentKind},
};
