use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Random bytes that the peer has to seal with the shared secret.
#[derive(Serialize, Deserialize, Debug)]
pub(crate) struct Challenge {
    #[serde(with = "serde_bytes")]
    pub challenge: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) enum AuthenticationMode {
    NoAuth,
    Encryption(Challenge),
}

/// First message of the handshake, sent by both sides at the same time.
#[derive(Serialize, Deserialize, Debug)]
pub(crate) struct AuthenticationRequest {
    pub protocol: u32,
    pub role: Cow<'static, str>,
    pub mode: AuthenticationMode,
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) struct EncryptionResponse {
    /// Peer challenge prefixed with our role, sealed by our sealer.
    #[serde(with = "serde_bytes")]
    pub response: Vec<u8>,

    #[serde(with = "serde_bytes")]
    pub nonce: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) enum AuthenticationResponse {
    NoAuth,
    Encryption(EncryptionResponse),
    Error { message: String },
}
