use crate::define_id_type;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

define_id_type!(ResourceProviderId);
define_id_type!(FrameworkId);
define_id_type!(AgentId);
define_id_type!(TaskId);
define_id_type!(ExecutorId);

pub const UUID_LENGTH: usize = 16;

/// Random 128-bit token used for operation identifiers, resource versions
/// and publish request correlation.
#[derive(Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uuid([u8; UUID_LENGTH]);

impl Uuid {
    pub fn random() -> Self {
        Self(rand::random())
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; UUID_LENGTH]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; UUID_LENGTH] {
        &self.0
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hex = hex::encode(self.0);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

impl Debug for Uuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
