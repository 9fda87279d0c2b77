//! Client credentials, cached access tokens, and the client-credentials token provider.

pub mod credentials;
pub mod provider;
pub mod token;

pub use credentials::*;
pub use provider::*;
pub use token::*;
