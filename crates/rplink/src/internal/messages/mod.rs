pub(crate) mod auth;
pub mod operation;
pub mod provider;
pub mod task;
