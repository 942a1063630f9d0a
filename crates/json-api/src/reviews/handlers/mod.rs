//! Reviews Handlers

pub(crate) mod create;
