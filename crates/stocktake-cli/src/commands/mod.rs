pub mod cache;
pub mod common;
pub mod queue;
pub mod status;

pub use common::resolve_db_path;
