use std::future::Future;
use std::net::SocketAddr;

/// Resolves the network endpoint of the controller before each connection attempt.
pub trait EndpointDetector {
    fn detect(&mut self) -> impl Future<Output = crate::Result<SocketAddr>>;
}

/// Detector that always returns the same address.
#[derive(Debug, Clone)]
pub struct ConstantEndpointDetector {
    address: SocketAddr,
}

impl ConstantEndpointDetector {
    pub fn new(address: SocketAddr) -> Self {
        ConstantEndpointDetector { address }
    }
}

impl EndpointDetector for ConstantEndpointDetector {
    async fn detect(&mut self) -> crate::Result<SocketAddr> {
        Ok(self.address)
    }
}
