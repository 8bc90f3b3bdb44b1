#![deny(clippy::await_holding_refcell_ref)]

pub mod common;
pub mod config;
pub mod provider;

pub type Error = crate::common::error::AgentError;
pub type Result<T> = std::result::Result<T, Error>;

// Reexports
pub use rplink;
