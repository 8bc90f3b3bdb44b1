use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;

use crate::internal::common::error::RpError;
use crate::internal::common::ids::Uuid;
use crate::internal::common::resources::{ANY_ROLE, DiskSourceType, Resource, ResourceAmount};
use crate::internal::messages::operation::Operation;
use crate::internal::messages::provider::{Call, Event, OperationState, ReconcileOperationsMsg};
use crate::internal::provider::detector::ConstantEndpointDetector;
use crate::internal::provider::handler::DefaultOperationHandler;
use crate::internal::provider::rpc::run_provider_session;
use crate::internal::provider::session::{ProviderSession, ProviderSessionRef, SessionState};
use crate::internal::tests::integration::utils::controller::MockController;
use crate::internal::tests::utils::env::{
    TEST_PROVIDER_NAME, apply_operation_event, test_configuration,
};

fn create_session(resources: &str) -> ProviderSessionRef {
    ProviderSession::new_ref(
        test_configuration(resources),
        Box::new(DefaultOperationHandler),
    )
}

#[tokio::test]
async fn test_subscribe_and_apply_operation() {
    let controller = MockController::start(None).await;
    let session_ref = create_session("disk:10");
    let mut detector = controller.detector();

    let controller_side = async {
        let mut handle = controller.accept().await.unwrap();
        let subscribe = handle.subscribe("rp-1").await;
        assert_eq!(subscribe.provider_info.name, TEST_PROVIDER_NAME);
        assert!(subscribe.provider_info.id.is_none());

        match handle.recv().await {
            Call::UpdateState(msg) => {
                assert_eq!(msg.provider_id.as_str(), "rp-1");
                assert_eq!(msg.resources.amount_of("disk"), ResourceAmount::new_units(10));
            }
            call => panic!("Expected UPDATE_STATE, got {call:?}"),
        }

        let operation_uuid = Uuid::random();
        let source = Resource::parse("disk", "10", ANY_ROLE).unwrap();
        handle
            .send(apply_operation_event(
                Operation::create_volume(source, DiskSourceType::Path),
                operation_uuid,
            ))
            .await;
        match handle.recv().await {
            Call::UpdateOperationStatus(msg) => {
                assert_eq!(msg.operation_uuid, operation_uuid);
                assert_eq!(msg.status.state, OperationState::Finished);
                let converted = msg.status.converted_resources.iter().next().unwrap();
                assert_eq!(converted.disk_source_type(), Some(DiskSourceType::Path));
            }
            call => panic!("Expected UPDATE_OPERATION_STATUS, got {call:?}"),
        }

        handle.send(Event::Unknown).await;
        handle.wait_for_close().await;
    };

    let (result, ()) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &None),
        controller_side
    );
    assert!(matches!(result, Err(RpError::ProtocolViolation(_))));
    assert_eq!(session_ref.get().state(), SessionState::Disconnected);
}

#[tokio::test]
async fn test_reconnect_keeps_operations() {
    let controller = MockController::start(None).await;
    let session_ref = create_session("");
    let mut detector = controller.detector();

    let controller_side = async {
        let mut handle = controller.accept().await.unwrap();
        handle.subscribe("rp-1").await;
        let operation_uuid = Uuid::random();
        handle
            .send(apply_operation_event(Operation::Unknown, operation_uuid))
            .await;
        let status = match handle.recv().await {
            Call::UpdateOperationStatus(msg) => msg.status,
            call => panic!("Expected UPDATE_OPERATION_STATUS, got {call:?}"),
        };
        (operation_uuid, status)
    };
    let (result, (operation_uuid, status)) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &None),
        controller_side
    );
    match result {
        Err(e) => assert!(e.is_recoverable(), "Unexpected error {e:?}"),
        Ok(()) => panic!("Session should end with an error"),
    }
    {
        let session = session_ref.get();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.provider_id().is_none());
        assert_eq!(session.unacknowledged_operations(), 1);
    }

    let controller_side = async {
        let mut handle = controller.accept().await.unwrap();
        let subscribe = handle.subscribe("rp-2").await;
        assert!(subscribe.provider_info.id.is_none());
        handle
            .send(Event::ReconcileOperations(ReconcileOperationsMsg {
                operation_uuids: vec![operation_uuid],
            }))
            .await;
        match handle.recv().await {
            Call::UpdateOperationStatus(msg) => {
                assert_eq!(msg.provider_id.as_str(), "rp-2");
                assert_eq!(msg.operation_uuid, operation_uuid);
                assert_eq!(msg.status, status);
            }
            call => panic!("Expected UPDATE_OPERATION_STATUS, got {call:?}"),
        }
    };
    let (result, ()) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &None),
        controller_side
    );
    assert!(matches!(result, Err(RpError::TransportError(_))));
    assert_eq!(session_ref.get().state(), SessionState::Disconnected);
}

#[tokio::test]
async fn test_subscribe_timeout() {
    let controller = MockController::start(None).await;
    let mut configuration = test_configuration("");
    configuration.subscribe_timeout = Some(Duration::from_millis(100));
    let session_ref =
        ProviderSession::new_ref(configuration, Box::new(DefaultOperationHandler));
    let mut detector = controller.detector();

    let controller_side = async {
        let mut handle = controller.accept().await.unwrap();
        assert!(matches!(handle.recv().await, Call::Subscribe(_)));
        handle.wait_for_close().await;
    };
    let (result, ()) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &None),
        controller_side
    );
    match result {
        Err(RpError::TransportError(msg)) => assert!(msg.contains("did not subscribe")),
        r => panic!("Unexpected result {r:?}"),
    }
    assert_eq!(session_ref.get().state(), SessionState::Disconnected);
}

#[tokio::test]
async fn test_controller_unavailable() {
    let address = {
        let listener = TcpListener::bind(SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0))
            .await
            .unwrap();
        listener.local_addr().unwrap()
    };
    let session_ref = create_session("disk:10");
    let mut detector = ConstantEndpointDetector::new(address);

    let result = run_provider_session(&session_ref, &mut detector, &None).await;
    assert!(matches!(result, Err(RpError::TransportError(_))));
    assert_eq!(session_ref.get().state(), SessionState::Disconnected);
}
