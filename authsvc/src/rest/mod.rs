pub mod api;
pub mod v1;
