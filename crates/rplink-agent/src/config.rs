use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rplink::messages::ResourceProviderInfo;
use rplink::provider::ProviderConfiguration;
use rplink::resources::{
    ANY_ROLE, DiskSource, DiskSourceType, Label, ReservationInfo, Resources,
    create_disk_resource, create_disk_source_block, create_disk_source_mount,
    create_disk_source_path, create_disk_source_raw, create_dynamic_reservation_info,
    create_static_reservation_info,
};

use crate::common::error::AgentError;

/// Contents of the agent configuration file.
///
/// ```toml
/// controller = "controller.local:5050"
///
/// [provider]
/// type = "org.rplink.rp.local.storage"
/// resources = "cpus:4;mem:1024"
///
/// [[provider.disks]]
/// source = "raw"
/// size = "2048"
/// id = "nvme0"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub controller: Option<String>,
    pub secret_file: Option<PathBuf>,
    pub provider: ProviderDef,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderDef {
    #[serde(rename = "type")]
    pub provider_type: String,
    /// Defaults to the hostname.
    pub name: Option<String>,
    /// Role of resources that do not specify their own role.
    #[serde(default = "default_role")]
    pub role: String,
    /// Scalar resources in the `name(role):value;...` format.
    #[serde(default)]
    pub resources: Option<String>,
    #[serde(default)]
    pub disks: Vec<DiskDef>,
    #[serde(default)]
    pub reservations: Vec<ReservationDef>,
    /// Humantime duration (e.g. `30s`), or `never` to wait without a limit.
    pub subscribe_timeout: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiskSourceDef {
    Path,
    Mount,
    Block,
    Raw,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DiskDef {
    pub source: DiskSourceDef,
    /// Size in megabytes.
    pub size: String,
    pub role: Option<String>,
    /// Mount point or directory; only valid for `path` and `mount` sources.
    pub root: Option<String>,
    pub id: Option<String>,
    pub profile: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReservationDef {
    pub role: String,
    /// Reservations with a principal are dynamic, the others static.
    pub principal: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

fn default_role() -> String {
    ANY_ROLE.to_string()
}

impl AgentConfig {
    pub fn load(path: &Path) -> crate::Result<AgentConfig> {
        log::debug!("Loading provider configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentError::ConfigurationError(format!(
                "Cannot read configuration file {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> crate::Result<AgentConfig> {
        Ok(toml::from_str(content)?)
    }

    pub fn provider_configuration(&self) -> crate::Result<ProviderConfiguration> {
        let provider = &self.provider;
        if provider.provider_type.trim().is_empty() {
            return Err(AgentError::ConfigurationError(
                "Provider type cannot be empty".to_string(),
            ));
        }
        let name = match &provider.name {
            Some(name) => name.clone(),
            None => gethostname::gethostname().to_string_lossy().into_owned(),
        };
        let mut info = ResourceProviderInfo::new(provider.provider_type.clone(), name);
        info.default_reservations = provider
            .reservations
            .iter()
            .map(ReservationDef::reservation_info)
            .collect();

        let mut resources = match &provider.resources {
            Some(text) => Resources::parse(text, &provider.role).map_err(|e| {
                AgentError::ConfigurationError(format!("Invalid resources: {e}"))
            })?,
            None => Resources::new(),
        };
        for disk in &provider.disks {
            resources.push(disk.resource(&provider.role)?);
        }

        let mut configuration = ProviderConfiguration::new(info);
        if !resources.is_empty() {
            configuration = configuration.with_resources(resources);
        }
        match provider.subscribe_timeout.as_deref() {
            None => {}
            Some("never") => configuration.subscribe_timeout = None,
            Some(value) => {
                let timeout = humantime::parse_duration(value).map_err(|e| {
                    AgentError::ConfigurationError(format!(
                        "Invalid subscribe timeout '{value}': {e}"
                    ))
                })?;
                configuration.subscribe_timeout = Some(timeout);
            }
        }
        Ok(configuration)
    }
}

impl DiskDef {
    fn source(&self) -> crate::Result<DiskSource> {
        let id = self.id.as_deref();
        let profile = self.profile.as_deref();
        let source = match (self.source, self.root.as_deref()) {
            (DiskSourceDef::Path, root) => create_disk_source_path(root, id, profile),
            (DiskSourceDef::Mount, root) => create_disk_source_mount(root, id, profile),
            (DiskSourceDef::Block, None) => create_disk_source_block(id, profile),
            (DiskSourceDef::Raw, None) => create_disk_source_raw(id, profile),
            (kind @ (DiskSourceDef::Block | DiskSourceDef::Raw), Some(root)) => {
                return Err(AgentError::ConfigurationError(format!(
                    "Disk source {} cannot have a root ({root})",
                    DiskSourceType::from(kind)
                )));
            }
        };
        Ok(source)
    }

    fn resource(&self, default_role: &str) -> crate::Result<rplink::resources::Resource> {
        let role = self.role.as_deref().unwrap_or(default_role);
        create_disk_resource(&self.size, role, None, None, Some(self.source()?), false)
            .map_err(|e| AgentError::ConfigurationError(format!("Invalid disk: {e}")))
    }
}

impl From<DiskSourceDef> for DiskSourceType {
    fn from(value: DiskSourceDef) -> Self {
        match value {
            DiskSourceDef::Path => DiskSourceType::Path,
            DiskSourceDef::Mount => DiskSourceType::Mount,
            DiskSourceDef::Block => DiskSourceType::Block,
            DiskSourceDef::Raw => DiskSourceType::Raw,
        }
    }
}

impl ReservationDef {
    fn reservation_info(&self) -> ReservationInfo {
        match &self.principal {
            Some(principal) => {
                let labels = (!self.labels.is_empty()).then(|| {
                    self.labels
                        .iter()
                        .map(|(key, value)| Label::new(key.as_str(), value.as_str()))
                        .collect()
                });
                create_dynamic_reservation_info(&self.role, Some(principal.as_str()), labels)
            }
            None => create_static_reservation_info(&self.role),
        }
    }
}
