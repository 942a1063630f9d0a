//! Recommendations Handlers

pub(crate) mod recommend;
