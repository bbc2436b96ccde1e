//! Looks up user accounts and checks submitted credentials against them.
pub mod domain;
pub mod foundation;
