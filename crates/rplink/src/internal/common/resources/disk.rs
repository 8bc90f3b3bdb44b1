use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Backing of a storage resource.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskSourceType {
    Path,
    Mount,
    Block,
    Raw,
}

impl DiskSourceType {
    /// Volume types are the only valid targets of a CREATE_VOLUME operation.
    pub fn is_volume(&self) -> bool {
        matches!(self, DiskSourceType::Path | DiskSourceType::Mount)
    }
}

impl Display for DiskSourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DiskSourceType::Path => "PATH",
            DiskSourceType::Mount => "MOUNT",
            DiskSourceType::Block => "BLOCK",
            DiskSourceType::Raw => "RAW",
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiskSource {
    pub kind: DiskSourceType,
    /// Root directory, only meaningful for `Path` and `Mount` sources.
    pub root: Option<String>,
    pub id: Option<String>,
    pub profile: Option<String>,
}

impl DiskSource {
    pub fn new(kind: DiskSourceType) -> Self {
        DiskSource {
            kind,
            root: None,
            id: None,
            profile: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VolumeMode {
    #[default]
    ReadWrite,
    ReadOnly,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Volume {
    pub container_path: String,
    pub host_path: Option<String>,
    pub mode: VolumeMode,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Persistence {
    pub id: String,
    pub principal: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DiskInfo {
    pub persistence: Option<Persistence>,
    pub volume: Option<Volume>,
    pub source: Option<DiskSource>,
}

/// Creates a disk description.
///
/// The volume is only set when `container_path` is given; its mode defaults to
/// read-write. A creator `principal` without `persistence_id` creates a persistence
/// record with an empty id, mirroring how the controller treats such volumes.
pub fn create_disk_info(
    persistence_id: Option<&str>,
    container_path: Option<&str>,
    mode: Option<VolumeMode>,
    host_path: Option<&str>,
    source: Option<DiskSource>,
    principal: Option<&str>,
) -> DiskInfo {
    let persistence = match (persistence_id, principal) {
        (None, None) => None,
        (id, principal) => Some(Persistence {
            id: id.unwrap_or_default().to_string(),
            principal: principal.map(|p| p.to_string()),
        }),
    };
    let volume = container_path.map(|container_path| Volume {
        container_path: container_path.to_string(),
        host_path: host_path.map(|p| p.to_string()),
        mode: mode.unwrap_or_default(),
    });
    DiskInfo {
        persistence,
        volume,
        source,
    }
}

fn create_disk_source(
    kind: DiskSourceType,
    root: Option<&str>,
    id: Option<&str>,
    profile: Option<&str>,
) -> DiskSource {
    DiskSource {
        kind,
        root: root.map(|r| r.to_string()),
        id: id.map(|i| i.to_string()),
        profile: profile.map(|p| p.to_string()),
    }
}

pub fn create_disk_source_path(
    root: Option<&str>,
    id: Option<&str>,
    profile: Option<&str>,
) -> DiskSource {
    create_disk_source(DiskSourceType::Path, root, id, profile)
}

pub fn create_disk_source_mount(
    root: Option<&str>,
    id: Option<&str>,
    profile: Option<&str>,
) -> DiskSource {
    create_disk_source(DiskSourceType::Mount, root, id, profile)
}

pub fn create_disk_source_block(id: Option<&str>, profile: Option<&str>) -> DiskSource {
    create_disk_source(DiskSourceType::Block, None, id, profile)
}

pub fn create_disk_source_raw(id: Option<&str>, profile: Option<&str>) -> DiskSource {
    create_disk_source(DiskSourceType::Raw, None, id, profile)
}
