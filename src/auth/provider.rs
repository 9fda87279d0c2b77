//! Client-credentials token acquisition with caching + singleflight refresh.
//!
//! [`TokenProvider::token`] returns the cached access token while it is fresh and only
//! calls the token endpoint when the cache is empty, expired, or inside the refresh skew.
//! An async guard ensures concurrent callers piggy-back on the same in-flight exchange
//! instead of stampeding the token endpoint; readers of the cache always observe a whole
//! record, either the one before the refresh or the one after it.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessTokenRecord, Credentials, token},
	error::ConfigError,
	ext::{CallContext, InterceptorChain},
	http::{self, ApiHttpClient},
	obs::{self, CallOutcome, CallSpan},
};

/// Operation label used for token exchanges in spans, metrics, and interceptor contexts.
pub const TOKEN_EXCHANGE: &str = "authorize_token";

/// Owns the cached token for one set of credentials.
pub struct TokenProvider<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	credentials: Credentials,
	token_url: Url,
	refresh_skew: Duration,
	interceptors: InterceptorChain,
	cached: RwLock<Option<AccessTokenRecord>>,
	refresh_guard: AsyncMutex<()>,
}
impl<C> TokenProvider<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Default window before expiry in which tokens are refreshed early.
	pub const DEFAULT_REFRESH_SKEW: Duration = Duration::seconds(60);

	/// Creates a provider with an empty cache.
	pub fn new(
		http_client: impl Into<Arc<C>>,
		credentials: Credentials,
		token_url: Url,
		refresh_skew: Duration,
		interceptors: InterceptorChain,
	) -> Self {
		Self {
			http_client: http_client.into(),
			credentials,
			token_url,
			refresh_skew: if refresh_skew.is_negative() { Duration::ZERO } else { refresh_skew },
			interceptors,
			cached: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Returns the credentials this provider exchanges.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Returns the token endpoint.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// Returns a snapshot of the cached token, if any, without refreshing it.
	pub fn current(&self) -> Option<AccessTokenRecord> {
		self.cached.read().clone()
	}

	/// Returns a fresh access token, exchanging the credentials when needed.
	pub(crate) async fn token(&self) -> Result<AccessTokenRecord> {
		if let Some(current) = self.fresh_at(OffsetDateTime::now_utc()) {
			return Ok(current);
		}

		let _singleflight = self.refresh_guard.lock().await;

		// Another caller may have completed the exchange while this one waited.
		if let Some(current) = self.fresh_at(OffsetDateTime::now_utc()) {
			return Ok(current);
		}

		let record = self.exchange().await?;

		*self.cached.write() = Some(record.clone());

		Ok(record)
	}

	/// Drops the cached token if it is still the `rejected` one.
	///
	/// Returns `false` when a concurrent refresh already replaced it.
	pub(crate) fn invalidate(&self, rejected: &AccessTokenRecord) -> bool {
		let mut cached = self.cached.write();

		match cached.as_ref() {
			Some(current) if current.secret() == rejected.secret() => {
				*cached = None;

				true
			},
			_ => false,
		}
	}

	fn fresh_at(&self, now: OffsetDateTime) -> Option<AccessTokenRecord> {
		self.cached
			.read()
			.as_ref()
			.filter(|record| !record.needs_refresh_at(now, self.refresh_skew))
			.cloned()
	}

	async fn exchange(&self) -> Result<AccessTokenRecord> {
		let span = CallSpan::new(TOKEN_EXCHANGE, "exchange");

		obs::record_token_exchange(CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut request = Request::builder()
					.method(Method::POST)
					.uri(self.token_url.as_str())
					.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
					.header(ACCEPT, "application/json")
					.body(self.credentials.grant_form().into_bytes())
					.map_err(ConfigError::from)?;
				let ctx = CallContext::token_exchange();

				self.interceptors.before_send(&ctx, &mut request);

				let response =
					self.http_client.execute(request).await.map_err(http::map_transport_error)?;

				self.interceptors.after_receive(&ctx, &response);

				token::parse_token_response(
					response.status().as_u16(),
					response.body(),
					OffsetDateTime::now_utc(),
				)
				.map_err(Error::from)
			})
			.await;

		match &result {
			Ok(_) => obs::record_token_exchange(CallOutcome::Success),
			Err(_) => obs::record_token_exchange(CallOutcome::Failure),
		}

		result
	}
}
impl<C> Debug for TokenProvider<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("credentials", &self.credentials)
			.field("token_url", &self.token_url.as_str())
			.field("refresh_skew", &self.refresh_skew)
			.field("cached", &self.cached.read().is_some())
			.finish()
	}
}
