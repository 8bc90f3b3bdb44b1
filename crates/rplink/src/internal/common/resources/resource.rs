use crate::internal::common::ids::ResourceProviderId;
use crate::internal::common::resources::amount::ResourceAmount;
use crate::internal::common::resources::disk::{
    DiskInfo, DiskSource, DiskSourceType, VolumeMode, create_disk_info,
};
use crate::internal::common::resources::reservation::{
    ReservationInfo, ReservationKind, create_static_reservation_info,
};
use crate::internal::common::resources::{ANY_ROLE, DISK_RESOURCE_NAME, ResourceParseError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub name: String,
    pub amount: ResourceAmount,
    /// Reservation stack, the last item is the most refined reservation.
    pub reservations: Vec<ReservationInfo>,
    pub disk: Option<DiskInfo>,
    pub provider_id: Option<ResourceProviderId>,
    pub shared: bool,
}

impl Resource {
    pub fn new(name: impl Into<String>, amount: ResourceAmount) -> Self {
        Resource {
            name: name.into(),
            amount,
            reservations: Vec::new(),
            disk: None,
            provider_id: None,
            shared: false,
        }
    }

    /// Parses a single scalar resource. A role other than `*` adds a static reservation.
    pub fn parse(name: &str, value: &str, role: &str) -> Result<Resource, ResourceParseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ResourceParseError::EmptyName);
        }
        let mut resource = Resource::new(name, value.parse()?);
        if role != ANY_ROLE {
            resource
                .reservations
                .push(create_static_reservation_info(role));
        }
        Ok(resource)
    }

    /// Role of the most refined reservation, `*` for unreserved resources.
    pub fn role(&self) -> &str {
        self.reservations
            .last()
            .map(|r| r.role.as_str())
            .unwrap_or(ANY_ROLE)
    }

    pub fn is_reserved(&self) -> bool {
        !self.reservations.is_empty()
    }

    pub fn is_persistent_volume(&self) -> bool {
        self.disk
            .as_ref()
            .is_some_and(|disk| disk.persistence.is_some())
    }

    pub fn disk_source_type(&self) -> Option<DiskSourceType> {
        self.disk
            .as_ref()
            .and_then(|disk| disk.source.as_ref())
            .map(|source| source.kind)
    }

    /// Returns a copy of the resource whose disk source has the given type.
    /// Missing disk info and source are created; other source fields are kept.
    pub fn with_disk_source_type(&self, kind: DiskSourceType) -> Resource {
        let mut resource = self.clone();
        let disk = resource.disk.get_or_insert_with(DiskInfo::default);
        match disk.source.as_mut() {
            Some(source) => source.kind = kind,
            None => disk.source = Some(DiskSource::new(kind)),
        }
        resource
    }

    /// Two resources can be merged when they differ only in their amounts.
    /// Persistent volumes and shared resources are never merged.
    fn is_addable_to(&self, other: &Resource) -> bool {
        !self.shared
            && !other.shared
            && !self.is_persistent_volume()
            && self.name == other.name
            && self.reservations == other.reservations
            && self.disk == other.disk
            && self.provider_id == other.provider_id
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_reserved() {
            write!(f, "({})", self.role())?;
        }
        if let Some(kind) = self.disk_source_type() {
            write!(f, "[{kind}]")?;
        }
        write!(f, ":{}", self.amount)
    }
}

/// Ordered set of resources.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Resources(Vec<Resource>);

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `name:value` entries separated by `;`.
    /// An entry may override the default role with `name(role):value`.
    pub fn parse(text: &str, default_role: &str) -> Result<Resources, ResourceParseError> {
        let mut resources = Resources::new();
        for entry in text.split(';').map(|e| e.trim()).filter(|e| !e.is_empty()) {
            let (name, value) = entry
                .split_once(':')
                .ok_or_else(|| ResourceParseError::InvalidEntry(entry.to_string()))?;
            let (name, role) = match name.split_once('(') {
                Some((name, rest)) => {
                    let role = rest
                        .strip_suffix(')')
                        .filter(|role| !role.is_empty())
                        .ok_or_else(|| ResourceParseError::InvalidEntry(entry.to_string()))?;
                    (name, role)
                }
                None => (name, default_role),
            };
            resources.push(Resource::parse(name, value, role)?);
        }
        Ok(resources)
    }

    /// Adds a resource, merging it into an existing entry when possible.
    pub fn push(&mut self, resource: Resource) {
        if resource.amount.is_zero() {
            return;
        }
        match self.0.iter_mut().find(|r| r.is_addable_to(&resource)) {
            Some(existing) => existing.amount += resource.amount,
            None => self.0.push(resource),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of the amounts of all resources with the given name.
    pub fn amount_of(&self, name: &str) -> ResourceAmount {
        self.0
            .iter()
            .filter(|r| r.name == name)
            .map(|r| r.amount)
            .sum()
    }

    /// Returns a copy where every resource is owned by the given provider.
    pub fn with_provider_id(&self, provider_id: &ResourceProviderId) -> Resources {
        self.iter()
            .map(|r| Resource {
                provider_id: Some(provider_id.clone()),
                ..r.clone()
            })
            .collect()
    }
}

impl FromIterator<Resource> for Resources {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut resources = Resources::new();
        for resource in iter {
            resources.push(resource);
        }
        resources
    }
}

/// Keeps the resource even when its amount is zero.
impl From<Resource> for Resources {
    fn from(resource: Resource) -> Self {
        Resources(vec![resource])
    }
}

impl IntoIterator for Resources {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Resources {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Resources {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, resource) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{resource}")?;
        }
        Ok(())
    }
}

pub fn create_reserved_resource(
    name: &str,
    value: &str,
    reservations: Vec<ReservationInfo>,
) -> Result<Resource, ResourceParseError> {
    let mut resource = Resource::parse(name, value, ANY_ROLE)?;
    resource.reservations = reservations;
    Ok(resource)
}

/// Creates a `disk` resource. Disk info is only attached when at least one of
/// `persistence_id`, `container_path` or `source` is given.
pub fn create_disk_resource(
    value: &str,
    role: &str,
    persistence_id: Option<&str>,
    container_path: Option<&str>,
    source: Option<DiskSource>,
    shared: bool,
) -> Result<Resource, ResourceParseError> {
    let mut resource = Resource::parse(DISK_RESOURCE_NAME, value, role)?;
    if persistence_id.is_some() || container_path.is_some() || source.is_some() {
        resource.disk = Some(create_disk_info(
            persistence_id,
            container_path,
            None,
            None,
            source,
            None,
        ));
        resource.shared = shared;
    }
    Ok(resource)
}

/// Creates a persistent volume of `size` megabytes.
///
/// `reservation_principal` turns the most refined reservation into a dynamic one
/// owned by the principal; it has no effect on unreserved volumes.
#[allow(clippy::too_many_arguments)]
pub fn create_persistent_volume(
    size: ResourceAmount,
    role: &str,
    persistence_id: &str,
    container_path: &str,
    reservation_principal: Option<&str>,
    source: Option<DiskSource>,
    creator_principal: Option<&str>,
    shared: bool,
) -> Resource {
    let mut volume = Resource::new(DISK_RESOURCE_NAME, size);
    if role != ANY_ROLE {
        volume
            .reservations
            .push(create_static_reservation_info(role));
    }
    volume.disk = Some(create_disk_info(
        Some(persistence_id),
        Some(container_path),
        None,
        None,
        source,
        creator_principal,
    ));
    finish_persistent_volume(volume, reservation_principal, shared)
}

/// Turns an existing disk resource into a persistent volume, keeping its disk source.
pub fn make_persistent_volume(
    resource: Resource,
    persistence_id: &str,
    container_path: &str,
    reservation_principal: Option<&str>,
    creator_principal: Option<&str>,
    shared: bool,
) -> Resource {
    let mut volume = resource;
    let source = volume.disk.take().and_then(|disk| disk.source);
    volume.disk = Some(create_disk_info(
        Some(persistence_id),
        Some(container_path),
        Some(VolumeMode::ReadWrite),
        None,
        source,
        creator_principal,
    ));
    finish_persistent_volume(volume, reservation_principal, shared)
}

fn finish_persistent_volume(
    mut volume: Resource,
    reservation_principal: Option<&str>,
    shared: bool,
) -> Resource {
    if let Some(principal) = reservation_principal {
        if let Some(reservation) = volume.reservations.last_mut() {
            reservation.kind = ReservationKind::Dynamic;
            reservation.principal = Some(principal.to_string());
        }
    }
    volume.shared = shared;
    volume
}
