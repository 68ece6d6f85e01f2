//! Integration tests for the submission flow against a scripted service.
//!
//! The contract under test: input errors surface to the caller, transport
//! failures degrade to the placeholder tree, and whatever the service
//! returns is normalized before anyone sees it.

use serde_json::{json, Value};

use conceptmap::domain::DomainError;
use conceptmap::service::{
    self, GenerateRequest, MindMapService, ServiceError, Session,
};
use conceptmap::util::testing::init_test_setup;

/// Service double returning a fixed outcome.
struct ScriptedService {
    outcome: Result<Value, u16>,
}

impl MindMapService for ScriptedService {
    fn generate(&self, _request: &GenerateRequest) -> Result<Value, ServiceError> {
        match &self.outcome {
            Ok(value) => Ok(value.clone()),
            Err(status) => Err(ServiceError::Status(*status)),
        }
    }
}

#[test]
fn given_valid_response_when_submit_then_normalized_tree_is_returned() {
    init_test_setup();
    let service = ScriptedService {
        outcome: Ok(json!({
            "central": "Photosynthesis",
            "branches": [
                { "name": "Light Reactions", "children": [] },
                { "name": "Calvin Cycle", "children": [] }
            ]
        })),
    };
    let request = GenerateRequest::from_concept("Photosynthesis");

    let tree = service::submit(&service, &request).expect("submit");

    assert_eq!(tree.node_count(), 3);
    assert!(tree.find_by_name("Calvin Cycle").is_some());
}

#[test]
fn given_malformed_response_when_submit_then_diagnostic_tree_is_returned() {
    init_test_setup();
    let service = ScriptedService {
        outcome: Ok(json!({ "foo": "bad" })),
    };
    let request = GenerateRequest::from_concept("Photosynthesis");

    let tree = service::submit(&service, &request).expect("submit");

    assert!(tree.find_by_name("Invalid Data Format").is_some());
    assert!(tree.find_by_name("Check Console").is_some());
}

#[test]
fn given_unreachable_service_when_submit_then_placeholder_tree_is_returned() {
    init_test_setup();
    let service = ScriptedService {
        outcome: Err(503),
    };
    let request = GenerateRequest::from_concept("Photosynthesis");

    let tree = service::submit(&service, &request).expect("submit");

    assert_eq!(tree.node_count(), 4);
    let root = tree.root().expect("root");
    assert_eq!(
        tree.get_node(root).expect("root node").data.name,
        "Photosynthesis"
    );
    assert!(tree.find_by_name("Sub-Concept 1").is_some());
}

#[test]
fn given_empty_request_when_submit_then_error_before_any_call() {
    init_test_setup();
    let service = ScriptedService {
        outcome: Err(500),
    };
    let request = GenerateRequest::default();

    let result = service::submit(&service, &request);

    assert!(matches!(result, Err(DomainError::EmptySubmission)));
}

#[test]
fn given_rapid_resubmissions_when_responses_arrive_then_only_newest_wins() {
    init_test_setup();
    let mut session = Session::new();

    let slow = session.begin();
    let fast = session.begin();

    // The older in-flight response arrives late and must be dropped.
    assert!(!session.accept(slow));
    assert!(session.accept(fast));
}
