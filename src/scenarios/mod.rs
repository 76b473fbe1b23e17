//! The scenario catalog.
//!
//! Each scenario is a fixed, linear script of (request, assertion) steps.
//! Steps are chained with `?`: the first failing step ends the scenario and
//! later steps never run. Scenarios share nothing but the remote API.

mod crud;
mod edge_cases;
mod performance;
mod security;

use crate::api_client::{ApiClient, ApiClientError, ApiResponse, RequestSpec};
use crate::assertions::{AssertionFailure, ExpectedOutcome};
use crate::configuration::{PerformanceSettings, Settings};

pub const USERS_PATH: &str = "/users";

pub fn user_path(user_id: &str) -> String {
    format!("{}/{}", USERS_PATH, user_id)
}

/// Everything a scenario needs besides its own fixtures.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    pub client: ApiClient,
    /// Seeded in the target API
    pub existing_user_id: String,
    /// Guaranteed absent from the target API
    pub missing_user_id: String,
    pub performance: PerformanceSettings,
}

impl ScenarioContext {
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: settings.api.client()?,
            existing_user_id: settings.api.existing_user_id.clone(),
            missing_user_id: settings.api.missing_user_id.clone(),
            performance: settings.performance.clone(),
        })
    }

    pub async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, ScenarioError> {
        Ok(self.client.send(request).await?)
    }

    /// One step: send, then verify.
    pub async fn step(
        &self,
        request: &RequestSpec,
        expected: &ExpectedOutcome,
    ) -> Result<ApiResponse, ScenarioError> {
        let response = self.send(request).await?;
        expected.verify(&response)?;
        Ok(response)
    }
}

#[derive(thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
    #[error(transparent)]
    Transport(#[from] ApiClientError),
}

impl std::fmt::Debug for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::utils::error_chain_fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    CreateValidUser,
    GetExistingUser,
    CreateInvalidUser,
    UpdateUser,
    DeleteUser,
    NonExistingUser,
    MalformedDateOfBirth,
    FutureDateOfBirth,
    ListUsersPerformance,
    BulkCreatePerformance,
    XssInFirstName,
    MissingAuthorization,
    InvalidAuthorizationToken,
}

impl Scenario {
    /// Catalog order. `DeleteUser` removes the seeded user, so it runs after
    /// every scenario that reads or updates it.
    pub const ALL: [Scenario; 13] = [
        Scenario::CreateValidUser,
        Scenario::GetExistingUser,
        Scenario::CreateInvalidUser,
        Scenario::UpdateUser,
        Scenario::DeleteUser,
        Scenario::NonExistingUser,
        Scenario::MalformedDateOfBirth,
        Scenario::FutureDateOfBirth,
        Scenario::ListUsersPerformance,
        Scenario::BulkCreatePerformance,
        Scenario::XssInFirstName,
        Scenario::MissingAuthorization,
        Scenario::InvalidAuthorizationToken,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::CreateValidUser => "create_valid_user",
            Scenario::GetExistingUser => "get_existing_user",
            Scenario::CreateInvalidUser => "create_invalid_user",
            Scenario::UpdateUser => "update_user",
            Scenario::DeleteUser => "delete_user",
            Scenario::NonExistingUser => "non_existing_user",
            Scenario::MalformedDateOfBirth => "malformed_date_of_birth",
            Scenario::FutureDateOfBirth => "future_date_of_birth",
            Scenario::ListUsersPerformance => "list_users_performance",
            Scenario::BulkCreatePerformance => "bulk_create_performance",
            Scenario::XssInFirstName => "xss_in_first_name",
            Scenario::MissingAuthorization => "missing_authorization",
            Scenario::InvalidAuthorizationToken => "invalid_authorization_token",
        }
    }

    /// Scenarios whose name contains any of `filters`, in catalog order.
    /// No filters selects the whole catalog.
    pub fn select(filters: &[String]) -> Vec<Scenario> {
        Self::ALL
            .into_iter()
            .filter(|scenario| {
                filters.is_empty() || filters.iter().any(|f| scenario.name().contains(f.as_str()))
            })
            .collect()
    }

    pub async fn run(&self, context: &ScenarioContext) -> Result<(), ScenarioError> {
        match self {
            Scenario::CreateValidUser => crud::create_valid_user(context).await,
            Scenario::GetExistingUser => crud::get_existing_user(context).await,
            Scenario::CreateInvalidUser => crud::create_invalid_user(context).await,
            Scenario::UpdateUser => crud::update_user(context).await,
            Scenario::DeleteUser => crud::delete_user(context).await,
            Scenario::NonExistingUser => edge_cases::non_existing_user(context).await,
            Scenario::MalformedDateOfBirth => edge_cases::malformed_date_of_birth(context).await,
            Scenario::FutureDateOfBirth => edge_cases::future_date_of_birth(context).await,
            Scenario::ListUsersPerformance => performance::list_users(context).await,
            Scenario::BulkCreatePerformance => performance::bulk_create(context).await,
            Scenario::XssInFirstName => security::xss_in_first_name(context).await,
            Scenario::MissingAuthorization => security::missing_authorization(context).await,
            Scenario::InvalidAuthorizationToken => {
                security::invalid_authorization_token(context).await
            }
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
