//! Public extension contracts applied around every outbound call.
//!
//! Interceptors are registered by name on the client builder and run in registration
//! order before a request is sent, then in reverse order once its response arrives, so
//! the first interceptor registered wraps all the others. Token exchanges pass through
//! the same chain as operation calls.

pub mod interceptor;

pub use interceptor::*;
