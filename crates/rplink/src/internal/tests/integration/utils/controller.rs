use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use orion::aead::SecretKey;
use tokio::net::TcpListener;
use tokio::time::timeout;

use crate::connection::ControllerConnection;
use crate::internal::common::ids::ResourceProviderId;
use crate::internal::messages::provider::{Call, Event, SubscribeMsg, SubscribedMsg};
use crate::internal::provider::detector::ConstantEndpointDetector;

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Controller that accepts provider connections on localhost and lets the test drive
/// the protocol by hand.
pub struct MockController {
    listener: TcpListener,
    secret_key: Option<Arc<SecretKey>>,
}

impl MockController {
    pub async fn start(secret_key: Option<SecretKey>) -> Self {
        let address = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0);
        let listener = TcpListener::bind(address).await.unwrap();
        MockController {
            listener,
            secret_key: secret_key.map(Arc::new),
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.listener.local_addr().unwrap()
    }

    pub fn detector(&self) -> ConstantEndpointDetector {
        ConstantEndpointDetector::new(self.address())
    }

    pub async fn accept(&self) -> crate::Result<ControllerHandle> {
        let (socket, _) = timeout(WAIT_TIMEOUT, self.listener.accept())
            .await
            .expect("Timeout reached when waiting for a provider")?;
        let connection =
            ControllerConnection::accept_provider(socket, self.secret_key.clone()).await?;
        Ok(ControllerHandle { connection })
    }
}

pub struct ControllerHandle {
    connection: ControllerConnection,
}

impl ControllerHandle {
    pub async fn send(&mut self, event: Event) {
        self.connection.send(event).await.unwrap();
    }

    pub async fn recv(&mut self) -> Call {
        match timeout(WAIT_TIMEOUT, self.connection.receive()).await {
            Ok(Some(call)) => call.unwrap(),
            Ok(None) => panic!("Provider closed the connection"),
            Err(_) => panic!("Timeout reached when receiving a call"),
        }
    }

    /// Waits for SUBSCRIBE and confirms it with the given identity.
    pub async fn subscribe(&mut self, provider_id: &str) -> SubscribeMsg {
        let msg = match self.recv().await {
            Call::Subscribe(msg) => msg,
            call => panic!("Expected SUBSCRIBE, got {call:?}"),
        };
        self.send(Event::Subscribed(SubscribedMsg {
            provider_id: ResourceProviderId::new(provider_id),
        }))
        .await;
        msg
    }

    /// Waits until the provider closes the connection, ignoring remaining calls.
    pub async fn wait_for_close(mut self) {
        timeout(WAIT_TIMEOUT, async {
            while self.connection.receive().await.is_some() {}
        })
        .await
        .expect("Provider did not close the connection");
    }
}
