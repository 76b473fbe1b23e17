use super::{ScenarioContext, ScenarioError, USERS_PATH, user_path};
use crate::api_client::RequestSpec;
use crate::assertions::ExpectedOutcome;
use crate::domain::TestUserFixture;
use chrono::{Days, Utc};
use reqwest::StatusCode;

/// GET, PUT and DELETE on an unknown id are all 404.
pub async fn non_existing_user(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let path = user_path(&context.missing_user_id);
    let not_found = ExpectedOutcome::not_found();

    context.step(&RequestSpec::get(&path), &not_found).await?;
    let update = RequestSpec::put(&path).json(&TestUserFixture::valid())?;
    context.step(&update, &not_found).await?;
    context.step(&RequestSpec::delete(&path), &not_found).await?;
    Ok(())
}

pub async fn malformed_date_of_birth(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let fixture = TestUserFixture::valid().with_date_of_birth("1800-13-45");
    let request = RequestSpec::post(USERS_PATH).json(&fixture)?;
    context
        .step(&request, &ExpectedOutcome::status(StatusCode::BAD_REQUEST))
        .await?;
    Ok(())
}

pub async fn future_date_of_birth(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let today = Utc::now().date_naive();
    let next_year = today.checked_add_days(Days::new(366)).unwrap_or(today);
    let fixture = TestUserFixture::valid().born_on(next_year);
    let request = RequestSpec::post(USERS_PATH).json(&fixture)?;
    context
        .step(&request, &ExpectedOutcome::status(StatusCode::BAD_REQUEST))
        .await?;
    Ok(())
}
