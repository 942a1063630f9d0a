//! Recommendations

mod handlers;

pub(crate) use handlers::*;
