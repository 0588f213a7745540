//! Access Logs

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::AccessLogsRepositoryError;
pub use repository::*;
pub use service::*;
