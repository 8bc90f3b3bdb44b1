use crate::internal::common::ids::{FrameworkId, ResourceProviderId, Uuid};
use crate::internal::common::resources::{ReservationInfo, Resources};
use crate::internal::messages::operation::Operation;
use serde::{Deserialize, Serialize};

/// Static descriptor of a resource provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceProviderInfo {
    /// Assigned by the controller, `None` until the provider is subscribed.
    pub id: Option<ResourceProviderId>,
    pub provider_type: String,
    pub name: String,
    pub default_reservations: Vec<ReservationInfo>,
}

impl ResourceProviderInfo {
    pub fn new(provider_type: impl Into<String>, name: impl Into<String>) -> Self {
        ResourceProviderInfo {
            id: None,
            provider_type: provider_type.into(),
            name: name.into(),
            default_reservations: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Finished,
    Failed,
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    pub state: OperationState,
    pub message: Option<String>,
    /// Resources produced by the operation, e.g. a raw disk converted into a volume.
    pub converted_resources: Resources,
    pub status_uuid: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Ok,
    Failed,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubscribedMsg {
    pub provider_id: ResourceProviderId,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApplyOperationMsg {
    pub framework_id: Option<FrameworkId>,
    pub info: Operation,
    pub operation_uuid: Uuid,
    /// Version of the provider resources the operation was created against.
    pub resource_version_uuid: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublishResourcesMsg {
    pub uuid: Uuid,
    pub resources: Resources,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AcknowledgeOperationStatusMsg {
    pub status_uuid: Uuid,
    pub operation_uuid: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReconcileOperationsMsg {
    pub operation_uuids: Vec<Uuid>,
}

/// Messages sent from the controller to a resource provider.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum Event {
    Subscribed(SubscribedMsg),
    ApplyOperation(ApplyOperationMsg),
    PublishResources(PublishResourcesMsg),
    AcknowledgeOperationStatus(AcknowledgeOperationStatusMsg),
    ReconcileOperations(ReconcileOperationsMsg),
    Unknown,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Subscribed(_) => "SUBSCRIBED",
            Event::ApplyOperation(_) => "APPLY_OPERATION",
            Event::PublishResources(_) => "PUBLISH_RESOURCES",
            Event::AcknowledgeOperationStatus(_) => "ACKNOWLEDGE_OPERATION_STATUS",
            Event::ReconcileOperations(_) => "RECONCILE_OPERATIONS",
            Event::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubscribeMsg {
    pub provider_info: ResourceProviderInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateStateMsg {
    pub provider_id: ResourceProviderId,
    pub resources: Resources,
    pub resource_version_uuid: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateOperationStatusMsg {
    pub provider_id: ResourceProviderId,
    pub framework_id: Option<FrameworkId>,
    pub operation_uuid: Uuid,
    pub status: OperationStatus,
    pub latest_status: OperationStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdatePublishResourcesStatusMsg {
    pub provider_id: ResourceProviderId,
    pub uuid: Uuid,
    pub status: PublishStatus,
}

/// Messages sent from a resource provider to the controller.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum Call {
    Subscribe(SubscribeMsg),
    UpdateState(UpdateStateMsg),
    UpdateOperationStatus(UpdateOperationStatusMsg),
    UpdatePublishResourcesStatus(UpdatePublishResourcesStatusMsg),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Subscribe(_) => "SUBSCRIBE",
            Call::UpdateState(_) => "UPDATE_STATE",
            Call::UpdateOperationStatus(_) => "UPDATE_OPERATION_STATUS",
            Call::UpdatePublishResourcesStatus(_) => "UPDATE_PUBLISH_RESOURCES_STATUS",
        }
    }
}
