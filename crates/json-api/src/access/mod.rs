//! Gate-facing access verification endpoints.

mod handlers;
mod models;

pub(crate) use handlers::*;
