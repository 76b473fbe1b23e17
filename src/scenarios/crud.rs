use super::{ScenarioContext, ScenarioError, USERS_PATH, user_path};
use crate::api_client::RequestSpec;
use crate::assertions::ExpectedOutcome;
use crate::domain::TestUserFixture;
use reqwest::StatusCode;
use serde_json::json;

pub async fn create_valid_user(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let request = RequestSpec::post(USERS_PATH).json(&TestUserFixture::valid())?;
    context.step(&request, &ExpectedOutcome::success()).await?;
    Ok(())
}

pub async fn get_existing_user(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let user_id = &context.existing_user_id;
    let expected = ExpectedOutcome::success().with_body_containing(json!({ "id": user_id }));
    context
        .step(&RequestSpec::get(user_path(user_id)), &expected)
        .await?;
    Ok(())
}

pub async fn create_invalid_user(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let fixture = TestUserFixture::valid()
        .with_email("invalid-email")
        // Mandatory, left empty
        .with_personal_id_document(json!({}));
    let request = RequestSpec::post(USERS_PATH).json(&fixture)?;
    context
        .step(&request, &ExpectedOutcome::invalid_input())
        .await?;
    Ok(())
}

/// PUT new `email`/`firstName`, then GET must reflect both.
pub async fn update_user(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let path = user_path(&context.existing_user_id);
    let fixture = TestUserFixture::valid()
        .with_email("updated_email@example.com")
        .with_first_name("Jane");

    let update = RequestSpec::put(&path).json(&fixture)?;
    context.step(&update, &ExpectedOutcome::success()).await?;

    let expected = ExpectedOutcome::success().with_body_containing(json!({
        "email": fixture.email,
        "firstName": fixture.first_name,
    }));
    context.step(&RequestSpec::get(&path), &expected).await?;
    Ok(())
}

pub async fn delete_user(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let path = user_path(&context.existing_user_id);
    context
        .step(
            &RequestSpec::delete(&path),
            &ExpectedOutcome::status(StatusCode::NO_CONTENT),
        )
        .await?;
    context
        .step(&RequestSpec::get(&path), &ExpectedOutcome::not_found())
        .await?;
    Ok(())
}
