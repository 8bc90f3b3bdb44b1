use bytes::Bytes;
use rplink::messages::{ApplyOperationMsg, Event, Operation, ResourceProviderInfo, SubscribedMsg};
use rplink::provider::{
    ControllerComm, DefaultOperationHandler, ProviderConfiguration, ProviderSession,
};
use rplink::resources::{ANY_ROLE, DiskSourceType, Resource, Resources};
use rplink::{FrameworkId, ResourceProviderId, Uuid};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Creates a subscribed session whose calls are serialized into the returned queue.
pub fn create_session(resources: &str) -> (ProviderSession, UnboundedReceiver<Bytes>) {
    let configuration = ProviderConfiguration::new(ResourceProviderInfo::new(
        "org.rplink.rp.bench",
        "bench",
    ))
    .with_resources(Resources::parse(resources, ANY_ROLE).unwrap());
    let mut session = ProviderSession::new(
        ControllerComm::new(),
        configuration,
        Box::new(DefaultOperationHandler),
    );
    let (sender, receiver) = unbounded_channel();
    session.comm().attach(sender);
    session.connected().unwrap();
    session
        .process_event(Event::Subscribed(SubscribedMsg {
            provider_id: ResourceProviderId::new("rp-bench"),
        }))
        .unwrap();
    (session, receiver)
}

pub fn create_volume_events(count: usize) -> Vec<Event> {
    let source = Resource::parse("disk", "10", ANY_ROLE).unwrap();
    (0..count)
        .map(|_| {
            Event::ApplyOperation(ApplyOperationMsg {
                framework_id: Some(FrameworkId::new("framework-bench")),
                info: Operation::create_volume(source.clone(), DiskSourceType::Mount),
                operation_uuid: Uuid::random(),
                resource_version_uuid: Uuid::random(),
            })
        })
        .collect()
}
