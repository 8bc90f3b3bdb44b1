use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use bincode::{DefaultOptions, Options};
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{Sink, SinkExt, StreamExt};
use orion::aead::streaming::{Nonce, StreamOpener, StreamSealer, StreamTag};
use orion::kdf::SecretKey;
use orion::util::secure_rand_bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::internal::common::error::RpError;
use crate::internal::messages::auth::{
    AuthenticationMode, AuthenticationRequest, AuthenticationResponse, Challenge,
    EncryptionResponse,
};

const CHALLENGE_LENGTH: usize = 16;
const AUTH_TIMEOUT: Duration = Duration::from_secs(15);

/// One side of the authentication handshake.
///
/// Both peers send a request, answer the request of the other side and finally verify
/// the answer they received. With a secret key, each side proves the knowledge of the
/// key by sealing `<own role><peer challenge>`; the resulting sealer/opener pair then
/// encrypts the rest of the connection.
pub(crate) struct Authenticator {
    protocol: u32,
    my_role: &'static str,
    peer_role: &'static str,
    secret_key: Option<Arc<SecretKey>>,
    challenge: Vec<u8>,
    sealer: Option<StreamSealer>,
    error: Option<String>,
}

impl Authenticator {
    pub fn new(
        protocol: u32,
        my_role: &'static str,
        peer_role: &'static str,
        secret_key: Option<Arc<SecretKey>>,
    ) -> Self {
        Authenticator {
            protocol,
            my_role,
            peer_role,
            secret_key,
            challenge: Vec::new(),
            sealer: None,
            error: None,
        }
    }

    pub fn make_auth_request(&mut self) -> crate::Result<AuthenticationRequest> {
        let mode = match &self.secret_key {
            Some(_) => {
                let mut challenge = vec![0; CHALLENGE_LENGTH];
                secure_rand_bytes(&mut challenge).map_err(|_| "Generating challenge failed")?;
                self.challenge.clone_from(&challenge);
                AuthenticationMode::Encryption(Challenge { challenge })
            }
            None => AuthenticationMode::NoAuth,
        };
        Ok(AuthenticationRequest {
            protocol: self.protocol,
            role: Cow::Borrowed(self.my_role),
            mode,
        })
    }

    fn reject(&mut self, message: String) -> crate::Result<AuthenticationResponse> {
        self.error = Some(message.clone());
        Ok(AuthenticationResponse::Error { message })
    }

    pub fn make_auth_response(
        &mut self,
        request: AuthenticationRequest,
    ) -> crate::Result<AuthenticationResponse> {
        if request.protocol != self.protocol {
            return self.reject(format!(
                "Invalid version of protocol, expected {}, got {}",
                self.protocol, request.protocol
            ));
        }
        if request.role != self.peer_role {
            return self.reject(format!(
                "Expected peer role {}, got {}",
                self.peer_role, request.role
            ));
        }

        let (key, peer_challenge) = match (request.mode, self.secret_key.clone()) {
            (AuthenticationMode::NoAuth, None) => return Ok(AuthenticationResponse::NoAuth),
            (AuthenticationMode::Encryption(_), None) => {
                return self.reject("Peer requests authentication".to_string());
            }
            (AuthenticationMode::NoAuth, Some(_)) => {
                return self.reject("Peer does not support authentication".to_string());
            }
            (AuthenticationMode::Encryption(challenge), Some(key)) => {
                if challenge.challenge.len() != CHALLENGE_LENGTH {
                    return self.reject(format!(
                        "Invalid length of challenge ({})",
                        challenge.challenge.len()
                    ));
                }
                (key, challenge.challenge)
            }
        };

        log::debug!("Sealing challenge of {}", self.peer_role);
        let (mut sealer, nonce) = StreamSealer::new(&key).map_err(|_| "Creating sealer failed")?;
        let mut plain = Vec::with_capacity(self.my_role.len() + peer_challenge.len());
        plain.extend_from_slice(self.my_role.as_bytes());
        plain.extend_from_slice(&peer_challenge);
        let response = sealer
            .seal_chunk(&plain, &StreamTag::Message)
            .map_err(|_| "Cannot seal challenge")?;
        self.sealer = Some(sealer);

        Ok(AuthenticationResponse::Encryption(EncryptionResponse {
            response,
            nonce: nonce.as_ref().into(),
        }))
    }

    pub fn finish_authentication(
        mut self,
        response: AuthenticationResponse,
    ) -> crate::Result<(Option<StreamSealer>, Option<StreamOpener>)> {
        if let Some(error) = self.error.take() {
            return Err(format!("Authentication failed: {error}").into());
        }

        let opener = match (response, &self.secret_key) {
            (AuthenticationResponse::Error { message }, _) => {
                return Err(format!("Received authentication error: {message}").into());
            }
            (AuthenticationResponse::NoAuth, None) => None,
            (AuthenticationResponse::Encryption(response), Some(key)) => {
                let nonce = Nonce::from_slice(&response.nonce).map_err(|_| "Invalid nonce")?;
                let mut opener =
                    StreamOpener::new(key, &nonce).map_err(|_| "Failed to create opener")?;
                let (opened, tag) = opener
                    .open_chunk(&response.response)
                    .map_err(|_| "Cannot verify challenge")?;

                let mut expected = Vec::with_capacity(self.peer_role.len() + CHALLENGE_LENGTH);
                expected.extend_from_slice(self.peer_role.as_bytes());
                expected.extend_from_slice(&self.challenge);
                if tag != StreamTag::Message || opened != expected {
                    return Err("Received challenge does not match".into());
                }
                log::debug!("Challenge of {} verified", self.peer_role);
                Some(opener)
            }
            _ => return Err("Invalid authentication state".into()),
        };
        Ok((self.sealer, opener))
    }
}

async fn send_with_timeout<T: AsyncRead + AsyncWrite>(
    writer: &mut SplitSink<Framed<T, LengthDelimitedCodec>, Bytes>,
    data: Vec<u8>,
) -> crate::Result<()> {
    timeout(AUTH_TIMEOUT, writer.send(data.into()))
        .await
        .map_err(|_| RpError::TransportError("Sending authentication timed out".into()))?
        .map_err(|e| RpError::TransportError(format!("Sending authentication failed: {e}")))
}

async fn receive_with_timeout<T: AsyncRead + AsyncWrite, R: DeserializeOwned>(
    reader: &mut SplitStream<Framed<T, LengthDelimitedCodec>>,
) -> crate::Result<R> {
    let data = timeout(AUTH_TIMEOUT, reader.next())
        .await
        .map_err(|_| RpError::TransportError("Authentication message did not arrive".into()))?
        .ok_or_else(|| {
            RpError::TransportError(
                "The remote side closed connection without authentication message".into(),
            )
        })??;
    deserialize(&data)
}

pub async fn do_authentication<T: AsyncRead + AsyncWrite>(
    protocol: u32,
    my_role: &'static str,
    peer_role: &'static str,
    secret_key: Option<Arc<SecretKey>>,
    writer: &mut SplitSink<Framed<T, LengthDelimitedCodec>, Bytes>,
    reader: &mut SplitStream<Framed<T, LengthDelimitedCodec>>,
) -> crate::Result<(Option<StreamSealer>, Option<StreamOpener>)> {
    let mut authenticator = Authenticator::new(protocol, my_role, peer_role, secret_key);

    let request = authenticator.make_auth_request()?;
    send_with_timeout(writer, serialize(&request)?).await?;

    let peer_request: AuthenticationRequest = receive_with_timeout(reader).await?;
    let response = authenticator.make_auth_response(peer_request)?;
    send_with_timeout(writer, serialize(&response)?).await?;

    let peer_response: AuthenticationResponse = receive_with_timeout(reader).await?;
    authenticator.finish_authentication(peer_response)
}

pub fn open_message<T>(opener: &mut Option<StreamOpener>, message_data: &[u8]) -> crate::Result<T>
where
    T: DeserializeOwned,
{
    match opener {
        Some(opener) => {
            let (msg, tag) = opener
                .open_chunk(message_data)
                .map_err(|_| RpError::GenericError("Cannot decrypt message".to_string()))?;
            if tag != StreamTag::Message {
                return Err("Unexpected stream tag of an encrypted message".into());
            }
            deserialize(&msg)
        }
        None => deserialize(message_data),
    }
}

#[inline]
pub fn serialize<T>(value: &T) -> crate::Result<Vec<u8>>
where
    T: serde::Serialize + ?Sized,
{
    DefaultOptions::new()
        .with_limit(crate::MAX_FRAME_SIZE as u64)
        .with_fixint_encoding()
        .serialize(value)
        .map_err(|e| RpError::SerializationError(format!("Serialization failed: {e:?}")))
}

#[inline]
pub fn deserialize<'a, T>(bytes: &'a [u8]) -> crate::Result<T>
where
    T: Deserialize<'a>,
{
    DefaultOptions::new()
        .with_limit(crate::MAX_FRAME_SIZE as u64)
        .with_fixint_encoding()
        .deserialize(bytes)
        .map_err(|e| RpError::SerializationError(format!("Deserialization failed: {e:?}")))
}

pub fn seal_message(sealer: &mut Option<StreamSealer>, data: Bytes) -> crate::Result<Bytes> {
    match sealer {
        Some(sealer) => Ok(sealer
            .seal_chunk(&data, &StreamTag::Message)
            .map_err(|_| RpError::GenericError("Cannot encrypt message".to_string()))?
            .into()),
        None => Ok(data),
    }
}

/// Forwards serialized messages from the queue into the sink, sealing them on the way.
/// Finishes when all senders of the queue are dropped.
pub async fn forward_queue_to_sealed_sink<S: Sink<Bytes, Error = std::io::Error> + Unpin>(
    mut queue: UnboundedReceiver<Bytes>,
    mut sink: S,
    mut sealer: Option<StreamSealer>,
) -> crate::Result<()> {
    while let Some(data) = queue.recv().await {
        let data = seal_message(&mut sealer, data)?;
        if let Err(e) = sink.send(data).await {
            log::debug!("Forwarding from queue failed");
            return Err(RpError::TransportError(format!(
                "Sending message failed: {e}"
            )));
        }
    }
    Ok(())
}
