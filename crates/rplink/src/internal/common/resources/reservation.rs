use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationKind {
    /// Reservation configured on the provider itself, cannot be removed by frameworks.
    Static,
    /// Reservation created by a RESERVE operation.
    Dynamic,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    pub key: String,
    pub value: Option<String>,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Label {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReservationInfo {
    pub kind: ReservationKind,
    pub role: String,
    pub principal: Option<String>,
    pub labels: Vec<Label>,
}

pub fn create_static_reservation_info(role: &str) -> ReservationInfo {
    ReservationInfo {
        kind: ReservationKind::Static,
        role: role.to_string(),
        principal: None,
        labels: Vec::new(),
    }
}

pub fn create_dynamic_reservation_info(
    role: &str,
    principal: Option<&str>,
    labels: Option<Vec<Label>>,
) -> ReservationInfo {
    ReservationInfo {
        kind: ReservationKind::Dynamic,
        role: role.to_string(),
        principal: principal.map(|p| p.to_string()),
        labels: labels.unwrap_or_default(),
    }
}
