use crate::internal::common::resources::{DiskSourceType, Resource, Resources};
use crate::internal::messages::task::{ExecutorInfo, TaskGroupInfo, TaskInfo};
use serde::{Deserialize, Serialize};

/// Transformation of resources requested by a framework through the controller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Launch {
        task_infos: Vec<TaskInfo>,
    },
    LaunchGroup {
        executor: ExecutorInfo,
        task_group: TaskGroupInfo,
    },
    Reserve {
        resources: Resources,
    },
    Unreserve {
        resources: Resources,
    },
    /// Creates persistent volumes.
    Create {
        volumes: Resources,
    },
    /// Destroys persistent volumes.
    Destroy {
        volumes: Resources,
    },
    CreateVolume {
        source: Resource,
        target_type: DiskSourceType,
    },
    DestroyVolume {
        volume: Resource,
    },
    CreateBlock {
        source: Resource,
    },
    DestroyBlock {
        block: Resource,
    },
    /// Operation type this side of the protocol does not understand.
    Unknown,
}

impl Operation {
    pub fn reserve(resources: Resources) -> Self {
        Operation::Reserve { resources }
    }

    pub fn unreserve(resources: Resources) -> Self {
        Operation::Unreserve { resources }
    }

    pub fn create(volumes: Resources) -> Self {
        Operation::Create { volumes }
    }

    pub fn destroy(volumes: Resources) -> Self {
        Operation::Destroy { volumes }
    }

    pub fn launch(task_infos: Vec<TaskInfo>) -> Self {
        Operation::Launch { task_infos }
    }

    pub fn launch_group(executor: ExecutorInfo, task_group: TaskGroupInfo) -> Self {
        Operation::LaunchGroup {
            executor,
            task_group,
        }
    }

    pub fn create_volume(source: Resource, target_type: DiskSourceType) -> Self {
        Operation::CreateVolume {
            source,
            target_type,
        }
    }

    pub fn destroy_volume(volume: Resource) -> Self {
        Operation::DestroyVolume { volume }
    }

    pub fn create_block(source: Resource) -> Self {
        Operation::CreateBlock { source }
    }

    pub fn destroy_block(block: Resource) -> Self {
        Operation::DestroyBlock { block }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Launch { .. } => "LAUNCH",
            Operation::LaunchGroup { .. } => "LAUNCH_GROUP",
            Operation::Reserve { .. } => "RESERVE",
            Operation::Unreserve { .. } => "UNRESERVE",
            Operation::Create { .. } => "CREATE",
            Operation::Destroy { .. } => "DESTROY",
            Operation::CreateVolume { .. } => "CREATE_VOLUME",
            Operation::DestroyVolume { .. } => "DESTROY_VOLUME",
            Operation::CreateBlock { .. } => "CREATE_BLOCK",
            Operation::DestroyBlock { .. } => "DESTROY_BLOCK",
            Operation::Unknown => "UNKNOWN",
        }
    }
}
