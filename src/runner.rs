use crate::scenarios::{Scenario, ScenarioContext, ScenarioError};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum ScenarioOutcome {
    Passed,
    Failed(ScenarioError),
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub outcome: ScenarioOutcome,
    pub elapsed: Duration,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, ScenarioOutcome::Passed)
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.scenarios.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (Scenario, &ScenarioError)> {
        self.scenarios.iter().filter_map(|r| match &r.outcome {
            ScenarioOutcome::Failed(e) => Some((r.scenario, e)),
            ScenarioOutcome::Passed => None,
        })
    }
}

/// Runs `scenarios` one at a time, in the given order. A failing scenario is
/// recorded and the next one starts regardless.
pub async fn run_scenarios(context: &ScenarioContext, scenarios: &[Scenario]) -> SuiteReport {
    let mut report = SuiteReport::default();
    for scenario in scenarios {
        report.scenarios.push(run_scenario(context, *scenario).await);
    }
    tracing::info!(
        passed = report.passed_count(),
        failed = report.failed_count(),
        "Suite finished"
    );
    report
}

#[tracing::instrument(name = "Running scenario", skip_all, fields(scenario = %scenario))]
pub async fn run_scenario(context: &ScenarioContext, scenario: Scenario) -> ScenarioReport {
    let started = Instant::now();
    let outcome = match scenario.run(context).await {
        Ok(()) => {
            tracing::info!("Scenario passed");
            ScenarioOutcome::Passed
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Scenario failed"
            );
            ScenarioOutcome::Failed(e)
        }
    };
    ScenarioReport {
        scenario,
        outcome,
        elapsed: started.elapsed(),
    }
}
