//! Passgate Domain Concerns

pub mod access_logs;
pub mod audit;
pub mod cache;
pub mod passes;
pub mod qr;
pub mod students;
pub mod users;
pub mod verification;
