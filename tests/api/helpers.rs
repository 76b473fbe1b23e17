use crate::fake_user_api::FakeUserApi;
use crate::test_data::{TEST_AUTH_KEY, TEST_BULK_CREATE_COUNT};
use secrecy::Secret;
use std::sync::{LazyLock, Mutex};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use user_api_suite::configuration::get_configuration;
use user_api_suite::scenarios::ScenarioContext;
use user_api_suite::telemetry::{get_subscriber, init_subscriber};
use wiremock::matchers::path_regex;
use wiremock::{Match, Mock, MockServer, Request};

// This holds the guard for the entire lifetime of the test process
static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // The sink is part of the type returned by `get_subscriber`,
    // so each branch initialises its own subscriber.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, test_writer());
        init_subscriber(subscriber);
    }
});

fn test_writer() -> NonBlocking {
    let _ = std::fs::create_dir_all("tests/logs");
    let file_appender = tracing_appender::rolling::never("tests/logs", "api.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Store the guard to prevent it from being dropped
    *LOG_GUARD.lock().unwrap() = Some(guard);

    non_blocking
}

pub struct TestApi {
    pub server: MockServer,
    pub context: ScenarioContext,
}

impl TestApi {
    /// Serve every `/users` route from a stateful, well-behaved fake.
    pub async fn mount_fake_user_api(&self) -> FakeUserApi {
        let api = FakeUserApi::seeded(TEST_AUTH_KEY, &self.context.existing_user_id);
        Mock::given(path_regex(r"^/users(/[^/]+)?$"))
            .respond_with(api.clone())
            .mount(&self.server)
            .await;
        api
    }

    pub async fn received_request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// A mock server with nothing mounted, and a context pointing at it.
pub async fn spawn_test_api() -> TestApi {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.api.base_url = server.uri();
        c.api.auth_key = Secret::new(TEST_AUTH_KEY.to_string());
        c.performance.bulk_create_count = TEST_BULK_CREATE_COUNT;
        c
    };
    let context =
        ScenarioContext::from_settings(&configuration).expect("Failed to build the API client.");

    TestApi { server, context }
}

/// A mock server already serving the fake user API.
pub async fn spawn_fake_api() -> (TestApi, FakeUserApi) {
    let test_api = spawn_test_api().await;
    let fake = test_api.mount_fake_user_api().await;
    (test_api, fake)
}

pub struct HeaderAbsent(pub &'static str);

impl Match for HeaderAbsent {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key(self.0)
    }
}
