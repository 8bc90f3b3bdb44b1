pub mod resources;
pub mod session;
