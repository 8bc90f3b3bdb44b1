#[macro_use]
pub(crate) mod common;
pub mod messages;
pub mod provider;
pub(crate) mod transfer;

#[cfg(test)]
pub mod tests;
