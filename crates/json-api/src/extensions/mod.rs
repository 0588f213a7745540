//! Extension traits

mod depot;
mod result;
mod text;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use text::TextExt as _;
