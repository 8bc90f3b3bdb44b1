use std::path::Path;

use orion::aead::SecretKey;

use crate::common::error::AgentError;

/// Loads a hex encoded secret key shared with the controller.
pub fn read_secret_file(path: &Path) -> crate::Result<SecretKey> {
    log::info!("Reading secret file from file '{}'", path.display());
    let content = std::fs::read_to_string(path)?;
    deserialize_key(content.trim())
}

pub fn deserialize_key(key: &str) -> crate::Result<SecretKey> {
    let data = hex::decode(key).map_err(|e| {
        AgentError::ConfigurationError(format!("Could not deserialize secret key: {e}"))
    })?;
    SecretKey::from_slice(&data).map_err(|e| {
        AgentError::ConfigurationError(format!("Could not create secret key from slice: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::{deserialize_key, read_secret_file};
    use std::io::Write;

    #[test]
    fn test_read_secret_file() {
        let bytes: Vec<u8> = (0u8..32u8).collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", hex::encode(&bytes)).unwrap();

        let key = read_secret_file(file.path()).unwrap();
        assert_eq!(key.unprotected_as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_invalid_key() {
        assert!(deserialize_key("not-hex").is_err());
        assert!(deserialize_key("").is_err());
    }
}
