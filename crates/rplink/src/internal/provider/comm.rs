use crate::comm::serialize;
use crate::internal::messages::provider::Call;
use bytes::Bytes;
use tokio::sync::mpsc::UnboundedSender;

/// Outgoing side of a controller connection.
///
/// The session never owns the socket; it only holds the sending end of the queue that a
/// writer future drains into the connection. The queue is attached when a connection is
/// established and detached when it is lost.
#[derive(Default)]
pub struct RealControllerComm {
    sender: Option<UnboundedSender<Bytes>>,
}

pub enum ControllerComm {
    Real(RealControllerComm),
    #[cfg(test)]
    Test(crate::internal::tests::utils::comm::TestControllerComm),
}

impl Default for ControllerComm {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerComm {
    pub fn new() -> Self {
        ControllerComm::Real(RealControllerComm::default())
    }

    #[cfg(test)]
    pub fn new_test_comm() -> Self {
        ControllerComm::Test(crate::internal::tests::utils::comm::TestControllerComm::new())
    }

    #[cfg(test)]
    pub fn test(&mut self) -> &mut crate::internal::tests::utils::comm::TestControllerComm {
        match self {
            Self::Real(_) => panic!("Cannot get testing comm"),
            Self::Test(comm) => comm,
        }
    }

    pub fn attach(&mut self, sender: UnboundedSender<Bytes>) {
        match self {
            Self::Real(comm) => comm.sender = Some(sender),
            #[cfg(test)]
            Self::Test(_) => {}
        }
    }

    pub fn detach(&mut self) {
        match self {
            Self::Real(comm) => comm.sender = None,
            #[cfg(test)]
            Self::Test(_) => {}
        }
    }

    /// Queues a call for the controller. Delivery is not awaited.
    pub fn send_call(&mut self, call: Call) {
        match self {
            Self::Real(comm) => {
                let Some(sender) = comm.sender.as_ref() else {
                    log::debug!(
                        "Attempting to send {} to controller, but the controller is not connected",
                        call.name()
                    );
                    return;
                };
                match serialize(&call) {
                    Ok(data) => {
                        if sender.send(data.into()).is_err() {
                            log::debug!("Call {} could not be sent to controller", call.name());
                        }
                    }
                    Err(e) => log::error!("Cannot serialize call {}: {e}", call.name()),
                }
            }
            #[cfg(test)]
            Self::Test(comm) => comm.send_call(call),
        }
    }
}
