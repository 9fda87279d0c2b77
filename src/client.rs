//! Client facade: endpoint configuration, the builder, and the operation dispatcher.
//!
//! [`Client::execute`] resolves an operation name against the catalog, validates the
//! arguments, attaches a cached bearer token, and normalizes the response. When the API
//! answers `401` the cached token is dropped and the call is retried once with a fresh one.

pub mod documents;
pub mod request;

pub use documents::*;
pub use request::*;

// crates.io
use oauth2::http::StatusCode;
use url::Host;
// self
use crate::{
	_prelude::*,
	auth::{AccessTokenRecord, Credentials, TokenProvider},
	catalog::OperationCatalog,
	error::ConfigError,
	ext::{CallContext, InterceptorChain, RequestInterceptor},
	http::{self, ApiHttpClient, HttpResponse},
	obs::{self, CallOutcome, CallSpan},
	response::{self, ApiResponse},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Caller-supplied operation arguments keyed by wire name.
pub type Arguments = Map<String, Value>;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type OblioClient = Client<ReqwestHttpClient>;

/// API and token endpoint URLs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Base every operation path is appended to.
	pub base: Url,
	/// Client-credentials token endpoint.
	pub token: Url,
}
impl Endpoints {
	/// Production API root.
	pub const DEFAULT_BASE: &'static str = "https://www.oblio.eu/api/";

	const TOKEN_PATH: &'static str = "/authorize/token";

	/// Production endpoints.
	pub fn oblio() -> Result<Self> {
		let base = Url::parse(Self::DEFAULT_BASE)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self::from_base(base))
	}

	/// Derives the token endpoint (`<base>/authorize/token`) from an API root.
	pub fn from_base(base: Url) -> Self {
		let mut token = base.clone();

		token.set_path(&format!("{}{}", base.path().trim_end_matches('/'), Self::TOKEN_PATH));
		token.set_query(None);
		token.set_fragment(None);

		Self { base, token }
	}

	/// Ensures both endpoints use HTTPS, or plain HTTP on a loopback host.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (endpoint, url) in [("API", &self.base), ("token", &self.token)] {
			let allowed = match url.scheme() {
				"https" => true,
				"http" => is_loopback(url),
				_ => false,
			};

			if !allowed {
				return Err(ConfigError::InsecureEndpoint { endpoint, url: url.to_string() });
			}
		}

		Ok(())
	}
}

/// Collects configuration for a [`Client`].
pub struct ClientBuilder<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Client identifier and secret.
	pub credentials: Credentials,
	/// API root override.
	pub base_url: Option<Url>,
	/// Token endpoint override; derived from the API root when unset.
	pub token_url: Option<Url>,
	/// Window before expiry in which tokens are refreshed early.
	pub refresh_skew: Duration,
	/// Catalog override; the built-in table is used when unset.
	pub catalog: Option<Arc<OperationCatalog>>,
	/// Ordered request interceptors.
	pub interceptors: InterceptorChain,
	/// Transport shared by operation calls and token exchanges.
	pub http_client: Arc<C>,
}
impl<C> ClientBuilder<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Starts a builder for the provided credentials and transport.
	pub fn new(credentials: Credentials, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			credentials,
			base_url: None,
			token_url: None,
			refresh_skew: TokenProvider::<C>::DEFAULT_REFRESH_SKEW,
			catalog: None,
			interceptors: InterceptorChain::default(),
			http_client: http_client.into(),
		}
	}

	/// Overrides the API root (defaults to [`Endpoints::DEFAULT_BASE`]).
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Overrides the refresh skew (defaults to 60 seconds).
	pub fn refresh_skew(mut self, skew: Duration) -> Self {
		self.refresh_skew = skew;

		self
	}

	/// Replaces the operation catalog.
	pub fn catalog(mut self, catalog: impl Into<Arc<OperationCatalog>>) -> Self {
		self.catalog = Some(catalog.into());

		self
	}

	/// Registers an interceptor; reusing a name replaces the earlier one in place.
	pub fn interceptor(
		mut self,
		name: impl Into<String>,
		interceptor: impl 'static + RequestInterceptor,
	) -> Self {
		self.interceptors.register(name, Arc::new(interceptor));

		self
	}

	/// Swaps the transport.
	pub fn http_client<D>(self, http_client: impl Into<Arc<D>>) -> ClientBuilder<D>
	where
		D: ?Sized + ApiHttpClient,
	{
		ClientBuilder {
			credentials: self.credentials,
			base_url: self.base_url,
			token_url: self.token_url,
			refresh_skew: self.refresh_skew,
			catalog: self.catalog,
			interceptors: self.interceptors,
			http_client: http_client.into(),
		}
	}

	/// Validates the configuration and builds the client.
	pub fn build(self) -> Result<Client<C>> {
		let mut endpoints = match self.base_url {
			Some(base) => Endpoints::from_base(base),
			None => Endpoints::oblio()?,
		};

		if let Some(token) = self.token_url {
			endpoints.token = token;
		}

		endpoints.validate()?;

		let catalog = match self.catalog {
			Some(catalog) => catalog,
			None => OperationCatalog::builtin().map_err(ConfigError::from)?,
		};
		let interceptors = Arc::new(self.interceptors);
		let tokens = TokenProvider::new(
			Arc::clone(&self.http_client),
			self.credentials,
			endpoints.token.clone(),
			self.refresh_skew,
			InterceptorChain::clone(&interceptors),
		);

		Ok(Client {
			http_client: self.http_client,
			endpoints: Arc::new(endpoints),
			catalog,
			interceptors,
			tokens: Arc::new(tokens),
		})
	}
}
impl<C> Debug for ClientBuilder<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientBuilder")
			.field("credentials", &self.credentials)
			.field("base_url", &self.base_url.as_ref().map(Url::as_str))
			.field("token_url", &self.token_url.as_ref().map(Url::as_str))
			.field("refresh_skew", &self.refresh_skew)
			.field("interceptors", &self.interceptors)
			.finish()
	}
}

/// Async Oblio API client.
///
/// Cloning is cheap; clones share the transport, catalog, and token cache.
pub struct Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Resolved endpoints.
	pub endpoints: Arc<Endpoints>,
	/// Operation catalog consulted by [`Client::execute`].
	pub catalog: Arc<OperationCatalog>,
	/// Interceptors applied to every request.
	pub interceptors: Arc<InterceptorChain>,
	tokens: Arc<TokenProvider<C>>,
}
impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Returns the cached token's lifetime, if any, without contacting the token endpoint.
	///
	/// The bearer secret stays private to the client; `Debug` output redacts it.
	pub fn current_token(&self) -> Option<AccessTokenRecord> {
		self.tokens.current()
	}

	/// Runs the named catalog operation with `args`.
	pub async fn execute(&self, operation: &str, args: Arguments) -> Result<ApiResponse> {
		let span = CallSpan::new(operation, "execute");

		obs::record_call_outcome(operation, CallOutcome::Attempt);

		let result = span.instrument(self.dispatch(operation, args)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(operation, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(operation, CallOutcome::Failure),
		}

		result
	}

	async fn dispatch(&self, operation: &str, args: Arguments) -> Result<ApiResponse> {
		let descriptor = self
			.catalog
			.get(operation)
			.ok_or_else(|| Error::UnknownOperation { name: operation.to_owned() })?;
		let prepared = PreparedRequest::new(descriptor, args)?;
		let token = self.tokens.token().await?;
		let response = self.send(&prepared, &token, 1).await?;

		if response.status() != StatusCode::UNAUTHORIZED {
			return response::normalize(&response);
		}

		obs::note_token_rejected(operation);
		self.tokens.invalidate(&token);

		let token = self.tokens.token().await?;
		let response = self.send(&prepared, &token, 2).await?;

		response::normalize(&response)
	}

	async fn send(
		&self,
		prepared: &PreparedRequest<'_>,
		token: &AccessTokenRecord,
		attempt: u8,
	) -> Result<HttpResponse> {
		let mut request = prepared.to_http(&self.endpoints.base, token.secret())?;
		let ctx = CallContext::operation(&prepared.descriptor.name, attempt);

		self.interceptors.before_send(&ctx, &mut request);

		let response =
			self.http_client.execute(request).await.map_err(http::map_transport_error)?;

		self.interceptors.after_receive(&ctx, &response);

		Ok(response)
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Starts a builder backed by the default reqwest transport.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> ClientBuilder<ReqwestHttpClient> {
		ClientBuilder::new(Credentials::new(client_id, client_secret), ReqwestHttpClient::default())
	}

	/// Builds a production client with default settings.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
		Self::builder(client_id, client_secret).build()
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			endpoints: Arc::clone(&self.endpoints),
			catalog: Arc::clone(&self.catalog),
			interceptors: Arc::clone(&self.interceptors),
			tokens: Arc::clone(&self.tokens),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("endpoints", &self.endpoints)
			.field("operations", &self.catalog.len())
			.field("interceptors", &self.interceptors)
			.field("tokens", &self.tokens)
			.finish()
	}
}

macro_rules! def_operations {
	($($method:ident => $name:literal,)+) => {
		impl<C> Client<C>
		where
			C: ?Sized + ApiHttpClient,
		{
			$(
				#[doc = concat!("Runs the `", $name, "` operation.")]
				pub async fn $method(&self, args: Arguments) -> Result<ApiResponse> {
					self.execute($name, args).await
				}
			)+
		}

		/// Operation names wrapped by a typed [`Client`] method.
		pub const TYPED_OPERATIONS: &[&str] = &[$($name),+];
	};
}

def_operations! {
	get_companies => "getCompanies",
	get_clients => "getClients",
	get_products => "getProducts",
	get_series => "getSeries",
	get_languages => "getLanguages",
	get_management => "getManagement",
	get_vat_rates => "getVatRates",
	add_proforma => "addProforma",
	add_notice => "addNotice",
	add_invoice => "addInvoice",
	get_invoices => "getInvoices",
	get_proformas => "getProformas",
	get_notices => "getNotices",
	cancel_invoice => "cancelInvoice",
	cancel_proforma => "cancelProforma",
	cancel_notice => "cancelNotice",
	restore_invoice => "restoreInvoice",
	restore_proforma => "restoreProforma",
	restore_notice => "restoreNotice",
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(addr)) => addr.is_loopback(),
		Some(Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
