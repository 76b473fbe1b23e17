use crate::api_client::ApiClient;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub performance: PerformanceSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    pub auth_key: Secret<String>,
    /// Id of a user the target API is seeded with
    pub existing_user_id: String,
    /// Id the target API is guaranteed not to know
    pub missing_user_id: String,
}

impl ApiSettings {
    pub fn client(&self) -> Result<ApiClient, reqwest::Error> {
        ApiClient::new(self.base_url.clone(), self.auth_key.clone())
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct PerformanceSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub list_users_max_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub create_user_max_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub bulk_create_count: usize,
}

impl PerformanceSettings {
    pub fn list_users_limit(&self) -> Duration {
        Duration::from_millis(self.list_users_max_milliseconds)
    }

    pub fn create_user_limit(&self) -> Duration {
        Duration::from_millis(self.create_user_max_milliseconds)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_API__BASE_URL=http://staging:8080` would set `Settings.api.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The possible runtime environment for the suite.
#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Ci,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Ci => "ci",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "ci" => Ok(Self::Ci),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `ci`.",
                other
            )),
        }
    }
}
