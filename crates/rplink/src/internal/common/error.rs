use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error)]
pub enum RpError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Connecting to or talking with the controller failed.
    /// The caller may retry the connection.
    #[error("Transport error: {0}")]
    TransportError(String),
    /// The controller broke the handshake contract of the protocol.
    /// The session cannot continue after this error.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Error: {0}")]
    GenericError(String),
}

impl RpError {
    /// Returns true if the owning process may reconnect and continue with the same session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RpError::TransportError(_) | RpError::IoError(_))
    }
}

impl From<bincode::Error> for RpError {
    fn from(e: bincode::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}
impl From<String> for RpError {
    fn from(e: String) -> Self {
        Self::GenericError(e)
    }
}
impl From<&str> for RpError {
    fn from(e: &str) -> Self {
        Self::GenericError(e.to_string())
    }
}

pub(crate) fn protocol_violation<T>(message: String) -> crate::Result<T> {
    log::error!("Protocol violation: {message}");
    Err(RpError::ProtocolViolation(message))
}
