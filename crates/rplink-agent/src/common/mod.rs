pub mod cli;
pub mod error;
pub mod secret;
pub mod setup;
