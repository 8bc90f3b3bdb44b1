use crate::internal::common::resources::Resources;
use crate::internal::messages::provider::ResourceProviderInfo;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProviderConfiguration {
    pub info: ResourceProviderInfo,
    /// Resource pool announced to the controller after every subscription.
    pub resources: Option<Resources>,
    /// How long to wait for SUBSCRIBED after connecting.
    /// If `None`, the provider waits indefinitely.
    pub subscribe_timeout: Option<Duration>,
}

impl ProviderConfiguration {
    pub fn new(info: ResourceProviderInfo) -> Self {
        ProviderConfiguration {
            info,
            resources: None,
            subscribe_timeout: Some(DEFAULT_SUBSCRIBE_TIMEOUT),
        }
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = Some(resources);
        self
    }
}
