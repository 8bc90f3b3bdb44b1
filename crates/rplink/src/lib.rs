#![deny(clippy::await_holding_refcell_ref)]

#[macro_use]
pub mod internal;

pub mod comm;
pub mod connection;

pub use crate::internal::common::ids::{
    AgentId, ExecutorId, FrameworkId, ResourceProviderId, TaskId, UUID_LENGTH, Uuid,
};
pub use crate::internal::common::{Map, WrappedRcRefCell};

pub type Error = internal::common::error::RpError;
pub type Result<T> = std::result::Result<T, Error>;

pub const MAX_FRAME_SIZE: usize = 128 * 1024 * 1024;

pub mod resources {
    pub use crate::internal::common::resources::{
        ANY_ROLE, CPU_RESOURCE_NAME, DISK_RESOURCE_NAME, DiskInfo, DiskSource, DiskSourceType,
        Label, MEM_RESOURCE_NAME, Persistence, ReservationInfo, ReservationKind, Resource,
        ResourceAmount, ResourceFractions, ResourceParseError, ResourceUnits, Resources, Volume,
        VolumeMode, create_disk_info, create_disk_resource, create_disk_source_block,
        create_disk_source_mount, create_disk_source_path, create_disk_source_raw,
        create_dynamic_reservation_info, create_persistent_volume, create_reserved_resource,
        create_static_reservation_info, make_persistent_volume,
    };

    pub use crate::internal::common::resources::amount::{
        FRACTIONS_MAX_DIGITS, FRACTIONS_PER_UNIT,
    };
}

pub mod messages {
    pub use crate::internal::messages::operation::Operation;
    pub use crate::internal::messages::provider::{
        AcknowledgeOperationStatusMsg, ApplyOperationMsg, Call, Event, OperationState,
        OperationStatus, PublishResourcesMsg, PublishStatus, ReconcileOperationsMsg,
        ResourceProviderInfo, SubscribeMsg, SubscribedMsg, UpdateOperationStatusMsg,
        UpdatePublishResourcesStatusMsg, UpdateStateMsg,
    };
    pub use crate::internal::messages::task::{
        CommandInfo, ExecutorInfo, TaskGroupInfo, TaskInfo, TaskInfoBuilder, create_command_info,
        create_executor_info, create_task, create_task_group_info,
    };
}

pub mod provider {
    pub use crate::internal::provider::comm::ControllerComm;
    pub use crate::internal::provider::configuration::{
        DEFAULT_SUBSCRIBE_TIMEOUT, ProviderConfiguration,
    };
    pub use crate::internal::provider::detector::{ConstantEndpointDetector, EndpointDetector};
    pub use crate::internal::provider::handler::{
        DefaultOperationHandler, OperationConversionError, OperationHandler, convert_operation,
    };
    pub use crate::internal::provider::rpc::run_provider_session;
    pub use crate::internal::provider::session::{
        OperationRecord, ProviderSession, ProviderSessionRef, SessionState,
    };
}
