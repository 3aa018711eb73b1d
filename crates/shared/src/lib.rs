pub mod address;
pub mod domain;
pub mod error;
pub mod protocol;
