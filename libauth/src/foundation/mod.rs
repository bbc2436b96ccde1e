pub mod compare;
pub mod id;
