//! Catalog Handlers

pub(crate) mod categories;
pub(crate) mod products;
