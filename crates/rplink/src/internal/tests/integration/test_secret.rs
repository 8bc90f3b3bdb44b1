use std::sync::Arc;

use orion::aead::SecretKey;

use crate::internal::common::error::RpError;
use crate::internal::messages::provider::Call;
use crate::internal::provider::handler::DefaultOperationHandler;
use crate::internal::provider::rpc::run_provider_session;
use crate::internal::provider::session::{ProviderSession, ProviderSessionRef, SessionState};
use crate::internal::tests::integration::utils::controller::MockController;
use crate::internal::tests::utils::env::test_configuration;
use crate::internal::tests::utils::expect_error_message;

fn create_session() -> ProviderSessionRef {
    ProviderSession::new_ref(
        test_configuration("disk:10"),
        Box::new(DefaultOperationHandler),
    )
}

fn key(first_byte: u8) -> SecretKey {
    let mut key_bytes: Vec<_> = (0u8..32u8).collect();
    key_bytes[0] = first_byte;
    SecretKey::from_slice(&key_bytes).unwrap()
}

#[tokio::test]
async fn test_auth_same_key() {
    let controller = MockController::start(Some(key(0))).await;
    let session_ref = create_session();
    let mut detector = controller.detector();
    let secret_key = Some(Arc::new(key(0)));

    let controller_side = async {
        let mut handle = controller.accept().await.unwrap();
        handle.subscribe("rp-1").await;
        assert!(matches!(handle.recv().await, Call::UpdateState(_)));
    };
    let (result, ()) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &secret_key),
        controller_side
    );
    assert!(matches!(result, Err(RpError::TransportError(_))));
    assert_eq!(session_ref.get().state(), SessionState::Disconnected);
}

#[tokio::test]
async fn test_auth_different_key() {
    let controller = MockController::start(Some(key(0))).await;
    let session_ref = create_session();
    let mut detector = controller.detector();
    let secret_key = Some(Arc::new(key(100)));

    let (result, accepted) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &secret_key),
        controller.accept()
    );
    expect_error_message(result, "Cannot verify challenge");
    expect_error_message(accepted, "Cannot verify challenge");
    assert_eq!(session_ref.get().state(), SessionState::Disconnected);
}

#[tokio::test]
async fn test_controller_auth_provider_no_auth() {
    let controller = MockController::start(Some(key(0))).await;
    let session_ref = create_session();
    let mut detector = controller.detector();

    let (result, accepted) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &None),
        controller.accept()
    );
    expect_error_message(result, "Authentication failed: Peer requests authentication");
    expect_error_message(
        accepted,
        "Authentication failed: Peer does not support authentication",
    );
}

#[tokio::test]
async fn test_controller_no_auth_provider_auth() {
    let controller = MockController::start(None).await;
    let session_ref = create_session();
    let mut detector = controller.detector();
    let secret_key = Some(Arc::new(key(0)));

    let (result, accepted) = tokio::join!(
        run_provider_session(&session_ref, &mut detector, &secret_key),
        controller.accept()
    );
    expect_error_message(
        result,
        "Authentication failed: Peer does not support authentication",
    );
    expect_error_message(accepted, "Authentication failed: Peer requests authentication");
}
