use crate::internal::common::resources::{DiskSourceType, Resources};
use crate::internal::messages::operation::Operation;
use crate::internal::messages::provider::PublishStatus;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationConversionError {
    /// For handlers that only create volumes of the `PATH`/`MOUNT` types.
    #[error("{operation} cannot target disk source type {target}, it is not a volume type")]
    InvalidTargetType {
        operation: &'static str,
        target: DiskSourceType,
    },
    #[error("{0} operations are not supported by this provider")]
    Unsupported(&'static str),
    #[error("{0}")]
    Failed(String),
}

/// Decides how the provider reacts to requests of the controller.
///
/// The session calls the handler synchronously while processing an event, so an
/// implementation should only compute the outcome and leave long running work to
/// something outside of the session.
pub trait OperationHandler {
    /// Returns resources produced by the operation.
    /// An error is reported to the controller as a failed operation.
    fn apply_operation(
        &mut self,
        operation: &Operation,
    ) -> Result<Resources, OperationConversionError> {
        convert_operation(operation)
    }

    fn publish_resources(&mut self, _resources: &Resources) -> PublishStatus {
        PublishStatus::Ok
    }
}

/// Finishes every operation immediately and accepts every publish request.
#[derive(Default, Debug, Clone, Copy)]
pub struct DefaultOperationHandler;

impl OperationHandler for DefaultOperationHandler {}

/// Computes converted resources of disk operations.
/// Every disk operation converts its source into exactly one resource of the target type;
/// `CreateVolume` accepts any target type.
/// Operations that do not convert disks produce no resources.
pub fn convert_operation(operation: &Operation) -> Result<Resources, OperationConversionError> {
    let converted = match operation {
        Operation::CreateVolume {
            source,
            target_type,
        } => source.with_disk_source_type(*target_type).into(),
        Operation::DestroyVolume { volume } => {
            volume.with_disk_source_type(DiskSourceType::Raw).into()
        }
        Operation::CreateBlock { source } => {
            source.with_disk_source_type(DiskSourceType::Block).into()
        }
        Operation::DestroyBlock { block } => {
            block.with_disk_source_type(DiskSourceType::Raw).into()
        }
        Operation::Launch { .. }
        | Operation::LaunchGroup { .. }
        | Operation::Reserve { .. }
        | Operation::Unreserve { .. }
        | Operation::Create { .. }
        | Operation::Destroy { .. }
        | Operation::Unknown => Resources::new(),
    };
    Ok(converted)
}
