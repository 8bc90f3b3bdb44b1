use crate::internal::common::ids::{FrameworkId, ResourceProviderId, Uuid};
use crate::internal::common::resources::{ANY_ROLE, Resources};
use crate::internal::messages::operation::Operation;
use crate::internal::messages::provider::{
    ApplyOperationMsg, Call, Event, ResourceProviderInfo, SubscribedMsg,
};
use crate::internal::provider::comm::ControllerComm;
use crate::internal::provider::configuration::ProviderConfiguration;
use crate::internal::provider::handler::{DefaultOperationHandler, OperationHandler};
use crate::internal::provider::session::{ProviderSession, SessionState};
use crate::internal::tests::utils::comm::TestControllerComm;

pub const TEST_PROVIDER_TYPE: &str = "org.rplink.rp.test";
pub const TEST_PROVIDER_NAME: &str = "test";

pub fn test_provider_info() -> ResourceProviderInfo {
    ResourceProviderInfo::new(TEST_PROVIDER_TYPE, TEST_PROVIDER_NAME)
}

/// Configuration with the given pool; an empty string means no pool.
pub fn test_configuration(resources: &str) -> ProviderConfiguration {
    let configuration = ProviderConfiguration::new(test_provider_info());
    if resources.is_empty() {
        configuration
    } else {
        configuration.with_resources(Resources::parse(resources, ANY_ROLE).unwrap())
    }
}

pub struct TestEnv {
    session: ProviderSession,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new("")
    }
}

impl TestEnv {
    pub fn new(resources: &str) -> Self {
        Self::with_handler(resources, Box::new(DefaultOperationHandler))
    }

    pub fn with_handler(resources: &str, handler: Box<dyn OperationHandler>) -> Self {
        TestEnv {
            session: ProviderSession::new(
                ControllerComm::new_test_comm(),
                test_configuration(resources),
                handler,
            ),
        }
    }

    pub fn session(&mut self) -> &mut ProviderSession {
        &mut self.session
    }

    pub fn comm(&mut self) -> &mut TestControllerComm {
        self.session.comm().test()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Connects and subscribes the session, dropping all emitted calls.
    pub fn subscribe(&mut self, provider_id: &str) {
        self.session.connected().unwrap();
        self.session
            .process_event(subscribed_event(provider_id))
            .unwrap();
        assert_eq!(self.state(), SessionState::Subscribed);
        self.comm().take_calls();
    }

    pub fn apply(&mut self, operation: Operation) -> crate::Result<Uuid> {
        let operation_uuid = Uuid::random();
        self.session
            .process_event(apply_operation_event(operation, operation_uuid))?;
        Ok(operation_uuid)
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        self.comm().take_calls()
    }
}

pub fn test_framework_id() -> FrameworkId {
    FrameworkId::new("framework-1")
}

pub fn subscribed_event(provider_id: &str) -> Event {
    Event::Subscribed(SubscribedMsg {
        provider_id: ResourceProviderId::new(provider_id),
    })
}

pub fn apply_operation_event(operation: Operation, operation_uuid: Uuid) -> Event {
    Event::ApplyOperation(ApplyOperationMsg {
        framework_id: Some(test_framework_id()),
        info: operation,
        operation_uuid,
        resource_version_uuid: Uuid::random(),
    })
}
