use super::{ScenarioContext, ScenarioError, USERS_PATH};
use crate::api_client::RequestSpec;
use crate::assertions::{ExpectedOutcome, expect_within};
use crate::domain::TestUserFixture;

/// Only the elapsed time is asserted; the listing may well be paginated.
pub async fn list_users(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let response = context.send(&RequestSpec::get(USERS_PATH)).await?;
    expect_within(
        &response.request_line,
        response.elapsed,
        context.performance.list_users_limit(),
    )?;
    Ok(())
}

/// Creates `bulk_create_count` users one after another. Each call must
/// succeed and finish under the per-user limit.
pub async fn bulk_create(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let count = context.performance.bulk_create_count;
    let limit = context.performance.create_user_limit();

    for i in 0..count {
        let fixture = TestUserFixture::valid().with_unique_email();
        let request = RequestSpec::post(USERS_PATH).json(&fixture)?;
        let response = context.step(&request, &ExpectedOutcome::success()).await?;
        expect_within(
            format!("creating user {} of {}", i + 1, count),
            response.elapsed,
            limit,
        )?;
    }
    tracing::debug!(count, "Bulk creation finished");
    Ok(())
}
