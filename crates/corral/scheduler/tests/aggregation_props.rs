//! Aggregation property: every emitted action is counted exactly once

use async_trait::async_trait;
use corral_scheduler::{
    ActionContext, ActionError, ControlPlaneError, InMemoryControlPlane, Result as SchedulerResult,
    Scheduler, SchedulerConfig, SchedulerFactory, SchedulerHandler, SchedulingAction,
};
use corral_state::InMemoryEnvironmentRepository;
use corral_types::{
    ClusterSnapshot, DeploymentMethod, Environment, EnvironmentDescription, EnvironmentId,
    EnvironmentRevision, EnvironmentType, SchedulerInput,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Succeed,
    Fail,
    Error,
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Succeed),
        Just(Outcome::Fail),
        Just(Outcome::Error),
    ]
}

struct Scripted {
    outcome: Outcome,
    delay_ms: u64,
    finished: Arc<AtomicUsize>,
}

#[async_trait]
impl SchedulingAction for Scripted {
    async fn execute(&self, _ctx: &ActionContext) -> Result<bool, ActionError> {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::Succeed => Ok(true),
            Outcome::Fail => Ok(false),
            Outcome::Error => Err(ControlPlaneError::Rejected("scripted".into()).into()),
        }
    }

    fn describe(&self) -> String {
        format!("{:?}", self.outcome)
    }
}

struct ScriptedScheduler {
    script: Vec<(Outcome, u64)>,
    finished: Arc<AtomicUsize>,
}

impl Scheduler for ScriptedScheduler {
    fn schedule(
        &self,
        _snapshot: &ClusterSnapshot,
        _environment: &EnvironmentDescription,
    ) -> Vec<Box<dyn SchedulingAction>> {
        self.script
            .iter()
            .map(|&(outcome, delay_ms)| {
                Box::new(Scripted {
                    outcome,
                    delay_ms,
                    finished: self.finished.clone(),
                }) as Box<dyn SchedulingAction>
            })
            .collect()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedFactory(Arc<ScriptedScheduler>);

impl SchedulerFactory for ScriptedFactory {
    fn scheduler_for(
        &self,
        _environment: &EnvironmentDescription,
    ) -> SchedulerResult<Arc<dyn Scheduler>> {
        Ok(self.0.clone())
    }
}

fn repository() -> Arc<InMemoryEnvironmentRepository> {
    let environment_id = EnvironmentId::new("123456789012", "cluster1", "environment1");
    let repo = Arc::new(InMemoryEnvironmentRepository::new());
    repo.create_environment(
        Environment::new(
            environment_id.clone(),
            EnvironmentType::SingleTask,
            DeploymentMethod::replace_after_terminate(),
        )
        .with_active_revision("1"),
    )
    .unwrap();
    repo.create_revision(EnvironmentRevision::new(environment_id, "1", "arn:::::task:1"))
        .unwrap();
    repo
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn counts_match_outcomes(
        script in prop::collection::vec((outcome(), 0u64..20), 0..24),
        limit in 0usize..4,
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let finished = Arc::new(AtomicUsize::new(0));
        let scheduler = Arc::new(ScriptedScheduler {
            script: script.clone(),
            finished: finished.clone(),
        });
        let handler = SchedulerHandler::new(
            repository(),
            Arc::new(InMemoryControlPlane::new()),
            Arc::new(ScriptedFactory(scheduler)),
            SchedulerConfig::default().with_max_concurrent_actions(limit),
        );

        let output = runtime
            .block_on(handler.handle(SchedulerInput::new(
                ClusterSnapshot::empty("cluster1"),
                EnvironmentId::new("123456789012", "cluster1", "environment1"),
            )))
            .unwrap();

        let expected_ok = script
            .iter()
            .filter(|(o, _)| matches!(o, Outcome::Succeed))
            .count() as u64;

        prop_assert_eq!(output.successful_actions, expected_ok);
        prop_assert_eq!(output.failed_actions, script.len() as u64 - expected_ok);
        prop_assert_eq!(finished.load(Ordering::SeqCst), script.len());
    }
}
