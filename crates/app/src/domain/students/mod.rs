//! Students
//!
//! Student records are owned by another system; passes only need to know
//! whether a student exists, where they study and whether they are enrolled.

pub mod records;
mod repository;

pub use repository::*;
