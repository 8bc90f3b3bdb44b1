pub mod amount;
pub mod disk;
pub mod reservation;
pub mod resource;

use thiserror::Error;

pub use amount::{ResourceAmount, ResourceFractions, ResourceUnits};
pub use disk::{
    DiskInfo, DiskSource, DiskSourceType, Persistence, Volume, VolumeMode, create_disk_info,
    create_disk_source_block, create_disk_source_mount, create_disk_source_path,
    create_disk_source_raw,
};
pub use reservation::{
    Label, ReservationInfo, ReservationKind, create_dynamic_reservation_info,
    create_static_reservation_info,
};
pub use resource::{
    Resource, Resources, create_disk_resource, create_persistent_volume, create_reserved_resource,
    make_persistent_volume,
};

pub const DISK_RESOURCE_NAME: &str = "disk";
pub const CPU_RESOURCE_NAME: &str = "cpus";
pub const MEM_RESOURCE_NAME: &str = "mem";

/// Role of resources that are not reserved for anyone.
pub const ANY_ROLE: &str = "*";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceParseError {
    #[error("Invalid resource entry '{0}', expected 'name:value' or 'name(role):value'")]
    InvalidEntry(String),
    #[error("Invalid resource amount '{0}'")]
    InvalidAmount(String),
    #[error("Resource name cannot be empty")]
    EmptyName,
}
