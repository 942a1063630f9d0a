//! Authentication
//!
//! Requests carry the hosted auth provider's access token as a bearer token;
//! the middleware resolves it to the shopper's id.

pub(crate) mod middleware;
