//! Async services behind the Larder storefront: the hosted Postgres backend,
//! realtime order updates and the HTTP collaborators.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod geocoding;
pub mod tasks;

#[cfg(test)]
mod test;

mod uuids;
