pub use crate::internal::transfer::auth::deserialize;
pub use crate::internal::transfer::auth::serialize;
pub use crate::internal::transfer::auth::{
    do_authentication, forward_queue_to_sealed_sink, open_message, seal_message,
};
pub use crate::internal::transfer::{CONTROLLER_ROLE, PROTOCOL_VERSION, PROVIDER_ROLE};

pub use crate::internal::provider::rpc::{ConnectionDescriptor, connect_to_controller};
