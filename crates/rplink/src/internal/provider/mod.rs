pub mod comm;
pub mod configuration;
pub mod detector;
pub mod handler;
pub mod rpc;
pub mod session;
