use crate::internal::common::error::protocol_violation;
use crate::internal::common::ids::{FrameworkId, ResourceProviderId, Uuid};
use crate::internal::common::resources::Resources;
use crate::internal::common::{Map, WrappedRcRefCell};
use crate::internal::messages::provider::{
    AcknowledgeOperationStatusMsg, ApplyOperationMsg, Call, Event, OperationState,
    OperationStatus, PublishResourcesMsg, ReconcileOperationsMsg, ResourceProviderInfo,
    SubscribeMsg, SubscribedMsg, UpdateOperationStatusMsg, UpdatePublishResourcesStatusMsg,
    UpdateStateMsg,
};
use crate::internal::provider::comm::ControllerComm;
use crate::internal::provider::configuration::ProviderConfiguration;
use crate::internal::provider::handler::OperationHandler;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    Subscribed,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connected => "connected",
            SessionState::Subscribed => "subscribed",
        })
    }
}

/// Last status reported for an operation that was not yet acknowledged.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub framework_id: Option<FrameworkId>,
    pub status: OperationStatus,
}

/// Provider side of the resource provider protocol.
///
/// The session reacts to events of the controller and emits calls through its
/// [`ControllerComm`]. It survives reconnects; only the provider identity is lost
/// when the connection goes down.
pub struct ProviderSession {
    comm: ControllerComm,
    state: SessionState,
    info: ResourceProviderInfo,
    resources: Option<Resources>,
    subscribe_timeout: Option<Duration>,
    operations: Map<Uuid, OperationRecord>,
    handler: Box<dyn OperationHandler>,
}

pub type ProviderSessionRef = WrappedRcRefCell<ProviderSession>;

impl ProviderSession {
    pub fn new(
        comm: ControllerComm,
        configuration: ProviderConfiguration,
        handler: Box<dyn OperationHandler>,
    ) -> Self {
        let ProviderConfiguration {
            mut info,
            resources,
            subscribe_timeout,
        } = configuration;
        info.id = None;
        ProviderSession {
            comm,
            state: SessionState::Disconnected,
            info,
            resources,
            subscribe_timeout,
            operations: Default::default(),
            handler,
        }
    }

    pub fn new_ref(
        configuration: ProviderConfiguration,
        handler: Box<dyn OperationHandler>,
    ) -> ProviderSessionRef {
        WrappedRcRefCell::wrap(Self::new(ControllerComm::new(), configuration, handler))
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn provider_id(&self) -> Option<&ResourceProviderId> {
        self.info.id.as_ref()
    }

    #[inline]
    pub fn info(&self) -> &ResourceProviderInfo {
        &self.info
    }

    #[inline]
    pub fn resources(&self) -> Option<&Resources> {
        self.resources.as_ref()
    }

    #[inline]
    pub fn subscribe_timeout(&self) -> Option<Duration> {
        self.subscribe_timeout
    }

    #[inline]
    pub fn comm(&mut self) -> &mut ControllerComm {
        &mut self.comm
    }

    pub fn operation(&self, operation_uuid: &Uuid) -> Option<&OperationRecord> {
        self.operations.get(operation_uuid)
    }

    /// Number of operations whose status was not acknowledged yet.
    pub fn unacknowledged_operations(&self) -> usize {
        self.operations.len()
    }

    /// Marks the transport as established and subscribes the provider.
    pub fn connected(&mut self) -> crate::Result<()> {
        if self.state != SessionState::Disconnected {
            return protocol_violation(format!(
                "Session is already {} when a new connection was established",
                self.state
            ));
        }
        self.state = SessionState::Connected;
        log::info!(
            "Connected to controller, subscribing provider {}/{}",
            self.info.provider_type,
            self.info.name
        );
        self.send_call(Call::Subscribe(SubscribeMsg {
            provider_info: self.info.clone(),
        }))
    }

    pub fn on_subscribed(&mut self, msg: SubscribedMsg) -> crate::Result<()> {
        match self.state {
            SessionState::Disconnected => {
                return protocol_violation("SUBSCRIBED received while disconnected".into());
            }
            SessionState::Connected => {
                log::info!("Provider subscribed as {}", msg.provider_id);
            }
            SessionState::Subscribed => {
                log::info!(
                    "Provider resubscribed as {} (previously {:?})",
                    msg.provider_id,
                    self.info.id
                );
            }
        }
        self.state = SessionState::Subscribed;
        self.info.id = Some(msg.provider_id.clone());

        let resources = match &self.resources {
            Some(resources) if !resources.is_empty() => {
                resources.with_provider_id(&msg.provider_id)
            }
            _ => return Ok(()),
        };
        self.send_call(Call::UpdateState(UpdateStateMsg {
            provider_id: msg.provider_id,
            resources,
            resource_version_uuid: Uuid::random(),
        }))
    }

    /// An operation uuid that is already in the ledger is not applied again, its recorded
    /// status is resent instead.
    pub fn on_apply_operation(&mut self, msg: ApplyOperationMsg) -> crate::Result<()> {
        let provider_id = self.subscribed_id("APPLY_OPERATION")?;
        let ApplyOperationMsg {
            framework_id,
            info,
            operation_uuid,
            resource_version_uuid,
        } = msg;

        if let Some(record) = self.operations.get(&operation_uuid) {
            log::debug!("Operation {operation_uuid} was already applied, resending its status");
            let record = record.clone();
            return self.send_operation_status(provider_id, operation_uuid, record);
        }

        log::debug!(
            "Applying operation {operation_uuid} ({}) against resource version {resource_version_uuid}",
            info.name()
        );
        let status = match self.handler.apply_operation(&info) {
            Ok(converted_resources) => OperationStatus {
                state: OperationState::Finished,
                message: None,
                converted_resources,
                status_uuid: Uuid::random(),
            },
            Err(error) => {
                log::warn!("Operation {operation_uuid} ({}) failed: {error}", info.name());
                OperationStatus {
                    state: OperationState::Failed,
                    message: Some(error.to_string()),
                    converted_resources: Resources::new(),
                    status_uuid: Uuid::random(),
                }
            }
        };
        let record = OperationRecord {
            framework_id,
            status,
        };
        self.operations.insert(operation_uuid, record.clone());
        self.send_operation_status(provider_id, operation_uuid, record)
    }

    pub fn on_publish_resources(&mut self, msg: PublishResourcesMsg) -> crate::Result<()> {
        let provider_id = self.subscribed_id("PUBLISH_RESOURCES")?;
        let status = self.handler.publish_resources(&msg.resources);
        log::debug!(
            "Publishing resources {} ({}): {status:?}",
            msg.uuid,
            msg.resources
        );
        self.send_call(Call::UpdatePublishResourcesStatus(
            UpdatePublishResourcesStatusMsg {
                provider_id,
                uuid: msg.uuid,
                status,
            },
        ))
    }

    pub fn on_acknowledge_operation_status(
        &mut self,
        msg: AcknowledgeOperationStatusMsg,
    ) -> crate::Result<()> {
        self.subscribed_id("ACKNOWLEDGE_OPERATION_STATUS")?;
        match self.operations.get(&msg.operation_uuid) {
            Some(record) if record.status.status_uuid == msg.status_uuid => {
                log::debug!("Status of operation {} acknowledged", msg.operation_uuid);
                self.operations.remove(&msg.operation_uuid);
            }
            Some(record) => {
                log::debug!(
                    "Ignoring acknowledgement of status {} of operation {}, latest status is {}",
                    msg.status_uuid,
                    msg.operation_uuid,
                    record.status.status_uuid
                );
            }
            None => {
                log::debug!(
                    "Ignoring acknowledgement of unknown operation {}",
                    msg.operation_uuid
                );
            }
        }
        Ok(())
    }

    pub fn on_reconcile_operations(&mut self, msg: ReconcileOperationsMsg) -> crate::Result<()> {
        let provider_id = self.subscribed_id("RECONCILE_OPERATIONS")?;
        for operation_uuid in msg.operation_uuids {
            let Some(record) = self.operations.get(&operation_uuid).cloned() else {
                log::debug!("Cannot reconcile unknown operation {operation_uuid}");
                continue;
            };
            self.send_operation_status(provider_id.clone(), operation_uuid, record)?;
        }
        Ok(())
    }

    /// Marks the transport as lost. The identity is dropped, configured resources
    /// and unacknowledged operations are kept for the next connection.
    pub fn disconnected(&mut self) {
        if self.state != SessionState::Disconnected {
            log::info!("Disconnected from controller");
        }
        self.state = SessionState::Disconnected;
        self.info.id = None;
        self.comm.detach();
    }

    pub fn process_event(&mut self, event: Event) -> crate::Result<()> {
        log::debug!("Received event {}", event.name());
        match event {
            Event::Subscribed(msg) => self.on_subscribed(msg),
            Event::ApplyOperation(msg) => self.on_apply_operation(msg),
            Event::PublishResources(msg) => self.on_publish_resources(msg),
            Event::AcknowledgeOperationStatus(msg) => self.on_acknowledge_operation_status(msg),
            Event::ReconcileOperations(msg) => self.on_reconcile_operations(msg),
            Event::Unknown => protocol_violation("Received UNKNOWN event".into()),
        }
    }

    fn subscribed_id(&self, event: &str) -> crate::Result<ResourceProviderId> {
        match (&self.state, &self.info.id) {
            (SessionState::Subscribed, Some(provider_id)) => Ok(provider_id.clone()),
            (state, _) => protocol_violation(format!("{event} received while {state}")),
        }
    }

    fn send_operation_status(
        &mut self,
        provider_id: ResourceProviderId,
        operation_uuid: Uuid,
        record: OperationRecord,
    ) -> crate::Result<()> {
        let OperationRecord {
            framework_id,
            status,
        } = record;
        self.send_call(Call::UpdateOperationStatus(UpdateOperationStatusMsg {
            provider_id,
            framework_id,
            operation_uuid,
            latest_status: status.clone(),
            status,
        }))
    }

    fn send_call(&mut self, call: Call) -> crate::Result<()> {
        let allowed = match &call {
            Call::Subscribe(_) => self.state != SessionState::Disconnected,
            _ => self.state == SessionState::Subscribed,
        };
        if !allowed {
            return protocol_violation(format!(
                "Call {} cannot be sent while {}",
                call.name(),
                self.state
            ));
        }
        log::debug!("Sending call {}", call.name());
        self.comm.send_call(call);
        Ok(())
    }
}
