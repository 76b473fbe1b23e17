use super::{ScenarioContext, ScenarioError, USERS_PATH};
use crate::api_client::RequestSpec;
use crate::assertions::ExpectedOutcome;
use crate::domain::TestUserFixture;
use secrecy::Secret;

const XSS_PAYLOAD: &str = r#"<script>alert("XSS")</script>"#;
const BAD_AUTH_KEY: &str = "bad-auth-key";

pub async fn xss_in_first_name(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let fixture = TestUserFixture::valid().with_first_name(XSS_PAYLOAD);
    let request = RequestSpec::post(USERS_PATH).json(&fixture)?;
    context
        .step(&request, &ExpectedOutcome::invalid_input())
        .await?;
    Ok(())
}

pub async fn missing_authorization(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let request = RequestSpec::post(USERS_PATH)
        .json(&TestUserFixture::valid())?
        .without_credential();
    context
        .step(&request, &ExpectedOutcome::unauthorized())
        .await?;
    Ok(())
}

pub async fn invalid_authorization_token(context: &ScenarioContext) -> Result<(), ScenarioError> {
    let request = RequestSpec::post(USERS_PATH)
        .json(&TestUserFixture::valid())?
        .with_credential(Secret::new(BAD_AUTH_KEY.to_string()));
    context
        .step(&request, &ExpectedOutcome::unauthorized())
        .await?;
    Ok(())
}
