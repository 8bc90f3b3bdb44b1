use crate::internal::messages::provider::{
    Call, UpdateOperationStatusMsg, UpdatePublishResourcesStatusMsg, UpdateStateMsg,
};

/// Records calls instead of sending them.
#[derive(Default)]
pub struct TestControllerComm {
    calls: Vec<Call>,
}

impl TestControllerComm {
    pub fn new() -> Self {
        TestControllerComm { calls: Vec::new() }
    }

    pub fn send_call(&mut self, call: Call) {
        self.calls.push(call);
    }

    pub fn check_emptiness(&self) {
        assert!(
            self.calls.is_empty(),
            "Unexpected calls: {:?}",
            self.calls
        );
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn take_call(&mut self) -> Call {
        let mut calls = self.take_calls();
        assert_eq!(calls.len(), 1, "Expected exactly one call: {calls:?}");
        calls.pop().unwrap()
    }

    pub fn take_update_state(&mut self) -> UpdateStateMsg {
        match self.take_call() {
            Call::UpdateState(msg) => msg,
            call => panic!("Expected UPDATE_STATE, got {call:?}"),
        }
    }

    pub fn take_operation_status(&mut self) -> UpdateOperationStatusMsg {
        match self.take_call() {
            Call::UpdateOperationStatus(msg) => msg,
            call => panic!("Expected UPDATE_OPERATION_STATUS, got {call:?}"),
        }
    }

    pub fn take_publish_status(&mut self) -> UpdatePublishResourcesStatusMsg {
        match self.take_call() {
            Call::UpdatePublishResourcesStatus(msg) => msg,
            call => panic!("Expected UPDATE_PUBLISH_RESOURCES_STATUS, got {call:?}"),
        }
    }
}
