use tokio_util::codec::length_delimited::{Builder, LengthDelimitedCodec};

pub(crate) mod auth;

/// Version of the provider/controller protocol, checked during the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

pub const PROVIDER_ROLE: &str = "provider";
pub const CONTROLLER_ROLE: &str = "controller";

/// Frames are prefixed with their little-endian length.
pub(crate) fn make_protocol_builder() -> Builder {
    *LengthDelimitedCodec::builder()
        .little_endian()
        .max_frame_length(crate::MAX_FRAME_SIZE)
}
