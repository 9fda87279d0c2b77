//! Request interceptor contract and the ordered chain that applies it.

// self
use crate::{
	_prelude::*,
	auth::TOKEN_EXCHANGE,
	http::{HttpRequest, HttpResponse},
};

/// Hook observing or decorating every outbound request.
///
/// Both methods default to no-ops; override only what you need. Interceptors run on the
/// caller's task and must not block.
pub trait RequestInterceptor
where
	Self: Send + Sync,
{
	/// Runs before the request is handed to the transport.
	fn before_send(&self, _ctx: &CallContext<'_>, _request: &mut HttpRequest) {}

	/// Runs after the transport returns a response, whatever its status.
	fn after_receive(&self, _ctx: &CallContext<'_>, _response: &HttpResponse) {}
}

/// Kind of outbound call an interceptor is observing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Catalog operation call.
	Operation,
	/// Client-credentials token exchange.
	TokenExchange,
}

/// Metadata shared with interceptors for a single outbound call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext<'a> {
	/// Operation name, or `authorize_token` for token exchanges.
	pub operation: &'a str,
	/// Call kind.
	pub kind: CallKind,
	/// 1 for the first send, 2 for the retry after a rejected token.
	pub attempt: u8,
}
impl<'a> CallContext<'a> {
	/// Context for a catalog operation call.
	pub fn operation(operation: &'a str, attempt: u8) -> Self {
		Self { operation, kind: CallKind::Operation, attempt }
	}

	/// Context for a token exchange.
	pub fn token_exchange() -> Self {
		Self { operation: TOKEN_EXCHANGE, kind: CallKind::TokenExchange, attempt: 1 }
	}
}

/// Ordered set of named interceptors.
///
/// Registering a name that already exists replaces that interceptor in place.
#[derive(Clone, Default)]
pub struct InterceptorChain(Vec<(String, Arc<dyn RequestInterceptor>)>);
impl InterceptorChain {
	/// Appends (or replaces) the interceptor registered under `name`.
	pub fn register(&mut self, name: impl Into<String>, interceptor: Arc<dyn RequestInterceptor>) {
		let name = name.into();

		match self.0.iter_mut().find(|(existing, _)| *existing == name) {
			Some(slot) => slot.1 = interceptor,
			None => self.0.push((name, interceptor)),
		}
	}

	/// Returns interceptor names in execution order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(name, _)| name.as_str())
	}

	/// Returns the number of registered interceptors.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no interceptor is registered.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub(crate) fn before_send(&self, ctx: &CallContext<'_>, request: &mut HttpRequest) {
		for (_, interceptor) in &self.0 {
			interceptor.before_send(ctx, request);
		}
	}

	pub(crate) fn after_receive(&self, ctx: &CallContext<'_>, response: &HttpResponse) {
		for (_, interceptor) in self.0.iter().rev() {
			interceptor.after_receive(ctx, response);
		}
	}
}
impl Debug for InterceptorChain {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_list().entries(self.names()).finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;

	struct Recorder {
		label: &'static str,
		log: Arc<Mutex<Vec<String>>>,
	}
	impl RequestInterceptor for Recorder {
		fn before_send(&self, ctx: &CallContext<'_>, request: &mut HttpRequest) {
			request.headers_mut().insert(
				"x-interceptor",
				self.label.parse().expect("Label should be a valid header value."),
			);
			self.log.lock().push(format!("before:{}:{}", self.label, ctx.operation));
		}

		fn after_receive(&self, ctx: &CallContext<'_>, _response: &HttpResponse) {
			self.log.lock().push(format!("after:{}:{}", self.label, ctx.operation));
		}
	}

	fn recorder(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn RequestInterceptor> {
		Arc::new(Recorder { label, log: log.clone() })
	}

	#[test]
	fn chain_wraps_calls_in_registration_order() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let mut chain = InterceptorChain::default();

		chain.register("outer", recorder("outer", &log));
		chain.register("inner", recorder("inner", &log));

		let ctx = CallContext::operation("getSeries", 1);
		let mut request = HttpRequest::new(Vec::new());

		chain.before_send(&ctx, &mut request);
		chain.after_receive(&ctx, &HttpResponse::new(Vec::new()));

		assert_eq!(
			*log.lock(),
			[
				"before:outer:getSeries",
				"before:inner:getSeries",
				"after:inner:getSeries",
				"after:outer:getSeries",
			]
		);
		assert_eq!(
			request.headers().get("x-interceptor").and_then(|value| value.to_str().ok()),
			Some("inner")
		);
	}

	#[test]
	fn registering_same_name_replaces_in_place() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let mut chain = InterceptorChain::default();

		chain.register("audit", recorder("first", &log));
		chain.register("tracing", recorder("second", &log));
		chain.register("audit", recorder("third", &log));

		assert_eq!(chain.len(), 2);
		assert_eq!(chain.names().collect::<Vec<_>>(), ["audit", "tracing"]);

		chain.before_send(&CallContext::token_exchange(), &mut HttpRequest::new(Vec::new()));

		assert_eq!(*log.lock(), ["before:third:authorize_token", "before:second:authorize_token"]);
	}
}
