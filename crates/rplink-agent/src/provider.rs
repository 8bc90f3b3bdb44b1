use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use orion::aead::SecretKey;
use tokio::net::lookup_host;

use rplink::provider::{EndpointDetector, ProviderSessionRef, run_provider_session};

use crate::common::error::AgentError;

/// Resolves `host:port` of the controller before every connection attempt,
/// so that a controller which moved to another machine is found again.
pub struct ResolvingEndpointDetector {
    address: String,
}

impl ResolvingEndpointDetector {
    pub fn new(address: impl Into<String>) -> Self {
        ResolvingEndpointDetector {
            address: address.into(),
        }
    }
}

impl EndpointDetector for ResolvingEndpointDetector {
    async fn detect(&mut self) -> rplink::Result<SocketAddr> {
        let mut addresses = lookup_host(self.address.as_str()).await.map_err(|e| {
            rplink::Error::TransportError(format!(
                "Cannot resolve controller address {}: {e}",
                self.address
            ))
        })?;
        addresses.next().ok_or_else(|| {
            rplink::Error::TransportError(format!(
                "Controller address {} did not resolve to any address",
                self.address
            ))
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    pub interval: Duration,
    /// `None` means reconnecting forever.
    pub max_reconnects: Option<u32>,
}

/// Runs the session, reconnecting after transport failures.
///
/// Returns when the controller violates the protocol, authentication fails or the
/// reconnect limit is reached.
pub async fn run_provider<D: EndpointDetector>(
    session_ref: &ProviderSessionRef,
    detector: &mut D,
    secret_key: &Option<Arc<SecretKey>>,
    policy: ReconnectPolicy,
) -> crate::Result<()> {
    let mut reconnects = 0;
    loop {
        match run_provider_session(session_ref, detector, secret_key).await {
            Ok(()) => return Ok(()),
            Err(error) if error.is_recoverable() => {
                if policy.max_reconnects.is_some_and(|max| reconnects >= max) {
                    return Err(AgentError::GenericError(format!(
                        "Giving up after {reconnects} reconnect(s), last error: {error}"
                    )));
                }
                reconnects += 1;
                log::warn!(
                    "{error}, reconnecting in {}",
                    humantime::format_duration(policy.interval)
                );
                tokio::time::sleep(policy.interval).await;
            }
            Err(error) => {
                log::error!("Provider stopped: {error}");
                return Err(error.into());
            }
        }
    }
}
