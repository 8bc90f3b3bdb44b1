#[cfg(test)]
mod test_provider;
#[cfg(test)]
mod test_secret;

pub mod utils;
