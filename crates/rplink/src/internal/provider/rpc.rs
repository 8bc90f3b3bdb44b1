use std::future::pending;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures::stream::{SplitSink, SplitStream};
use futures::{Stream, StreamExt};
use orion::aead::SecretKey;
use orion::aead::streaming::{StreamOpener, StreamSealer};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::internal::common::error::RpError;
use crate::internal::messages::provider::Event;
use crate::internal::provider::detector::EndpointDetector;
use crate::internal::provider::session::{ProviderSessionRef, SessionState};
use crate::internal::transfer::auth::{do_authentication, forward_queue_to_sealed_sink, open_message};
use crate::internal::transfer::{
    CONTROLLER_ROLE, PROTOCOL_VERSION, PROVIDER_ROLE, make_protocol_builder,
};

pub struct ConnectionDescriptor {
    pub address: SocketAddr,
    pub receiver: SplitStream<Framed<TcpStream, LengthDelimitedCodec>>,
    pub sender: SplitSink<Framed<TcpStream, LengthDelimitedCodec>, Bytes>,
    pub sealer: Option<StreamSealer>,
    pub opener: Option<StreamOpener>,
}

/// Opens an authenticated connection to the controller. Makes a single attempt.
pub async fn connect_to_controller(
    address: SocketAddr,
    secret_key: &Option<Arc<SecretKey>>,
) -> crate::Result<ConnectionDescriptor> {
    log::info!("Connecting to controller at {address}");
    let stream = TcpStream::connect(address).await.map_err(|e| {
        RpError::TransportError(format!("Could not connect to controller at {address}: {e}"))
    })?;
    stream.set_nodelay(true)?;
    let (mut writer, mut reader) = make_protocol_builder().new_framed(stream).split();
    let (sealer, opener) = do_authentication(
        PROTOCOL_VERSION,
        PROVIDER_ROLE,
        CONTROLLER_ROLE,
        secret_key.clone(),
        &mut writer,
        &mut reader,
    )
    .await?;
    log::debug!("Connection to controller at {address} is authenticated");
    Ok(ConnectionDescriptor {
        address,
        receiver: reader,
        sender: writer,
        sealer,
        opener,
    })
}

/// Connects the session to the controller and processes controller events
/// until the connection is lost or the controller violates the protocol.
///
/// The session is always left disconnected when this function returns, so it
/// can be passed to this function again to reconnect.
pub async fn run_provider_session<D: EndpointDetector>(
    session_ref: &ProviderSessionRef,
    detector: &mut D,
    secret_key: &Option<Arc<SecretKey>>,
) -> crate::Result<()> {
    let address = detector.detect().await?;
    let ConnectionDescriptor {
        sender,
        receiver,
        sealer,
        opener,
        ..
    } = connect_to_controller(address, secret_key).await?;

    let (queue_sender, queue_receiver) = unbounded_channel::<Bytes>();
    let (event_sender, event_receiver) = unbounded_channel::<crate::Result<Event>>();
    let subscribe_timeout = {
        let mut session = session_ref.get_mut();
        session.comm().attach(queue_sender);
        if let Err(e) = session.connected() {
            session.disconnected();
            return Err(e);
        }
        session.subscribe_timeout()
    };

    let processing = async {
        let read_loop = forward_events_to_queue(receiver, opener, event_sender);
        let event_loop = session_event_loop(session_ref, event_receiver);
        tokio::pin! {
            let read_loop = read_loop;
            let event_loop = event_loop;
        }
        tokio::select! {
            r = &mut event_loop => r,
            () = &mut read_loop => event_loop.await,
        }
    };
    let send_loop = forward_queue_to_sealed_sink(queue_receiver, sender, sealer);

    let result = tokio::select! {
        r = processing => {
            log::debug!("Controller read connection has disconnected");
            r
        }
        r = send_loop => {
            log::debug!("Controller write connection has disconnected");
            r.and(Err(RpError::TransportError("Call queue was closed".into())))
        }
        () = subscribe_timeout_process(session_ref, subscribe_timeout) => {
            Err(RpError::TransportError("Controller did not subscribe the provider in time".into()))
        }
    };
    session_ref.get_mut().disconnected();
    if let Err(e) = &result {
        if e.is_recoverable() {
            log::warn!("Connection to controller was lost: {e}");
        }
    }
    result
}

/// Decodes incoming events and hands them over to the session.
/// The last item pushed into the queue is always an error describing why reading stopped.
async fn forward_events_to_queue(
    mut stream: impl Stream<Item = Result<BytesMut, std::io::Error>> + Unpin,
    mut opener: Option<StreamOpener>,
    queue: UnboundedSender<crate::Result<Event>>,
) {
    while let Some(data) = stream.next().await {
        let item = match data {
            Ok(data) => open_message::<Event>(&mut opener, &data).map_err(|e| match e {
                RpError::SerializationError(msg) => {
                    RpError::ProtocolViolation(format!("Cannot decode event: {msg}"))
                }
                e => e,
            }),
            Err(e) => Err(RpError::TransportError(format!(
                "Reading from controller failed: {e}"
            ))),
        };
        let failed = item.is_err();
        if queue.send(item).is_err() || failed {
            return;
        }
    }
    log::debug!("Connection to controller is closed");
    let _ = queue.send(Err(RpError::TransportError(
        "Controller connection closed".into(),
    )));
}

/// Processes events one by one in the order they arrived.
async fn session_event_loop(
    session_ref: &ProviderSessionRef,
    mut queue: UnboundedReceiver<crate::Result<Event>>,
) -> crate::Result<()> {
    while let Some(event) = queue.recv().await {
        let event = event?;
        session_ref.get_mut().process_event(event)?;
    }
    Err(RpError::TransportError("Event queue was closed".into()))
}

/// Finishes if the session is not subscribed after the given duration, otherwise never.
async fn subscribe_timeout_process(session_ref: &ProviderSessionRef, timeout: Option<Duration>) {
    let Some(timeout) = timeout else {
        return pending().await;
    };
    tokio::time::sleep(timeout).await;
    if session_ref.get().state() == SessionState::Subscribed {
        pending::<()>().await;
    }
    log::error!("Provider was not subscribed within {timeout:?}");
}
