use anyhow::Context;
use user_api_suite::configuration::get_configuration;
use user_api_suite::runner::run_scenarios;
use user_api_suite::scenarios::{Scenario, ScenarioContext};
use user_api_suite::telemetry::{get_subscriber, init_subscriber};

// Requests go out strictly one at a time, so a single thread is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("user-api-suite".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let context =
        ScenarioContext::from_settings(&configuration).context("Failed to build the API client.")?;

    // Positional arguments narrow the run to scenarios whose name contains any of them
    let filters: Vec<String> = std::env::args().skip(1).collect();
    let scenarios = Scenario::select(&filters);
    if scenarios.is_empty() {
        anyhow::bail!("No scenario matches {:?}", filters);
    }

    tracing::info!(
        base_url = context.client.base_url(),
        scenarios = scenarios.len(),
        "Running user API suite"
    );
    let report = run_scenarios(&context, &scenarios).await;

    if !report.all_passed() {
        let failed: Vec<&str> = report.failures().map(|(s, _)| s.name()).collect();
        anyhow::bail!(
            "{} of {} scenarios failed: {}",
            report.failed_count(),
            report.scenarios.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
