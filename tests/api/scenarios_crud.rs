use crate::helpers::{spawn_fake_api, spawn_test_api};
use crate::test_data::{INVALID_USER_PAYLOAD, TEST_AUTH_KEY, VALID_USER_PAYLOAD, payload};
use claims::{assert_err, assert_none, assert_ok};
use serde_json::json;
use user_api_suite::api_client::AUTH_HEADER;
use user_api_suite::assertions::AssertionFailure;
use user_api_suite::scenarios::{Scenario, ScenarioError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn create_valid_user_posts_the_documented_payload_and_accepts_200() {
    // Arrange
    let test_api = spawn_test_api().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(header(AUTH_HEADER, TEST_AUTH_KEY))
        .and(body_json(payload(VALID_USER_PAYLOAD)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_api.server)
        .await;

    // Act
    let outcome = Scenario::CreateValidUser.run(&test_api.context).await;

    // Assert
    assert_ok!(outcome);
}

#[tokio::test]
async fn create_valid_user_accepts_201() {
    let (test_api, fake) = spawn_fake_api().await;

    let outcome = Scenario::CreateValidUser.run(&test_api.context).await;

    assert_ok!(outcome);
    assert_eq!(fake.user_count(), 2);
}

#[tokio::test]
async fn create_valid_user_fails_on_a_validation_error() {
    let test_api = spawn_test_api().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"description": "Invalid Input"})))
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::CreateValidUser.run(&test_api.context).await;

    assert!(matches!(
        outcome,
        Err(ScenarioError::Assertion(AssertionFailure::Status { .. }))
    ));
}

#[tokio::test]
async fn get_existing_user_checks_the_id_in_the_body() {
    let (test_api, _fake) = spawn_fake_api().await;

    let outcome = Scenario::GetExistingUser.run(&test_api.context).await;

    assert_ok!(outcome);
}

#[tokio::test]
async fn get_existing_user_fails_when_the_body_has_another_id() {
    let test_api = spawn_test_api().await;
    Mock::given(method("GET"))
        .and(path("/users/555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "556", "firstName": "John"})))
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::GetExistingUser.run(&test_api.context).await;

    assert!(matches!(
        outcome,
        Err(ScenarioError::Assertion(AssertionFailure::Body { .. }))
    ));
}

#[tokio::test]
async fn create_invalid_user_sends_a_bad_email_and_an_empty_document() {
    let test_api = spawn_test_api().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(payload(INVALID_USER_PAYLOAD)))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"description": "Invalid Input", "status": 400})),
        )
        .expect(1)
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::CreateInvalidUser.run(&test_api.context).await;

    assert_ok!(outcome);
}

#[tokio::test]
async fn create_invalid_user_fails_if_the_api_accepts_it() {
    let test_api = spawn_test_api().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "1"})))
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::CreateInvalidUser.run(&test_api.context).await;

    assert_err!(outcome);
}

#[tokio::test]
async fn create_invalid_user_fails_on_a_different_description() {
    let test_api = spawn_test_api().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"description": "Bad email"})))
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::CreateInvalidUser.run(&test_api.context).await;

    assert!(matches!(
        outcome,
        Err(ScenarioError::Assertion(AssertionFailure::Body { .. }))
    ));
}

#[tokio::test]
async fn update_user_verifies_the_stored_changes() {
    let (test_api, fake) = spawn_fake_api().await;

    let outcome = Scenario::UpdateUser.run(&test_api.context).await;

    assert_ok!(outcome);
    let stored = fake.user("555").unwrap();
    assert_eq!(stored["firstName"], "Jane");
    assert_eq!(stored["email"], "updated_email@example.com");
}

#[tokio::test]
async fn update_user_fails_when_the_change_is_not_visible() {
    let test_api = spawn_test_api().await;
    Mock::given(method("PUT"))
        .and(path("/users/555"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "555",
            "firstName": "John",
            "email": "john.doe@example.com"
        })))
        .expect(1)
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::UpdateUser.run(&test_api.context).await;

    assert!(matches!(
        outcome,
        Err(ScenarioError::Assertion(AssertionFailure::Body { .. }))
    ));
}

#[tokio::test]
async fn delete_user_then_get_yields_404() {
    let (test_api, fake) = spawn_fake_api().await;

    let outcome = Scenario::DeleteUser.run(&test_api.context).await;

    assert_ok!(outcome);
    assert_none!(fake.user("555"));
}

#[tokio::test]
async fn delete_user_fails_if_the_user_is_still_retrievable() {
    let test_api = spawn_test_api().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&test_api.server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "555"})))
        .expect(1)
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::DeleteUser.run(&test_api.context).await;

    assert_err!(outcome);
}

#[tokio::test]
async fn delete_user_stops_after_a_failed_delete() {
    let test_api = spawn_test_api().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_api.server)
        .await;
    // Fail-fast: the verification GET must never be sent
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&test_api.server)
        .await;

    let outcome = Scenario::DeleteUser.run(&test_api.context).await;

    assert_err!(outcome);
}
