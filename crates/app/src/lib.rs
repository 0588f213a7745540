//! Pass issuance, verification and access logging for campus gates.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;
