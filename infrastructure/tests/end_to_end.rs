//! End-to-end reliability tests: full engine runs against simulated
//! oracles with scripted accuracy, collusion, and split behavior.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use stepwise_application::{
    CheckpointStore, EngineConfig, ExecutionParams, OracleError, RunTaskError, RunTaskUseCase,
};
use stepwise_domain::{
    ActionValue, Decomposer, EscalationPolicy, FieldType, NextStep, OutputSchema,
    StateTransitionError, StepContract, TaskState,
};
use stepwise_infrastructure::{
    FileCheckpointStore, JsonlOutcomeLog, MemoryCheckpointStore, SimulatedOracle, unreliable,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counter {
    value: i64,
}

impl TaskState for Counter {
    fn apply(&self, action: &ActionValue) -> Result<Self, StateTransitionError> {
        let delta = action
            .field("delta")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| StateTransitionError::new("missing delta"))?;
        if delta != 1 {
            return Err(StateTransitionError::new(format!(
                "illegal increment {delta}"
            )));
        }
        Ok(Self {
            value: self.value + delta,
        })
    }
}

/// One increment step per cursor until the counter reaches the target.
struct CountTo {
    target: i64,
}

impl Decomposer<Counter> for CountTo {
    fn next(&self, state: &Counter, cursor: u64) -> NextStep {
        if state.value >= self.target {
            NextStep::Complete
        } else {
            NextStep::Step(StepContract::new(
                cursor,
                format!("increase the counter by one (step {cursor})"),
                OutputSchema::new().field("delta", FieldType::Integer),
            ))
        }
    }
}

fn correct(_prompt: &str, _ordinal: u64) -> String {
    r#"{"delta": 1}"#.to_string()
}

/// Three-position toggle task for the composite-reliability scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Switchboard {
    flips: u64,
}

impl TaskState for Switchboard {
    fn apply(&self, action: &ActionValue) -> Result<Self, StateTransitionError> {
        match action.field("op").and_then(|v| v.as_str()) {
            Some("toggle") => Ok(Self {
                flips: self.flips + 1,
            }),
            other => Err(StateTransitionError::new(format!("unknown op {other:?}"))),
        }
    }
}

struct ToggleThree;

impl Decomposer<Switchboard> for ToggleThree {
    fn next(&self, state: &Switchboard, cursor: u64) -> NextStep {
        if state.flips >= 3 {
            NextStep::Complete
        } else {
            NextStep::Step(StepContract::new(
                cursor,
                format!("toggle the next switch (step {cursor})"),
                OutputSchema::new().field("op", FieldType::String),
            ))
        }
    }
}

/// Well-formed but wrong, and unique per invocation so wrong attempts never
/// collude into a quorum of their own.
fn unique_wrong(_prompt: &str, ordinal: u64) -> String {
    format!(r#"{{"op": "skip-{ordinal}"}}"#)
}

/// Flat k=5 with a full retry and escalation budget.
fn flat_five_config() -> EngineConfig {
    EngineConfig::default().with_escalation(
        EscalationPolicy::default()
            .with_initial_k(5)
            .with_growth_factor(1)
            .with_max_k(5)
            .with_max_retries(4)
            .with_escalation_rounds(2),
    )
}

/// A 70%-accurate oracle over a 3-step task, k=5: near-total composite
/// reliability despite the weak oracle.
#[tokio::test]
async fn test_unreliable_oracle_three_step_composite_reliability() {
    let runs = 1000;
    let mut successes = 0;

    for seed in 0..runs {
        let oracle = Arc::new(unreliable(
            seed,
            0.7,
            |_, _| r#"{"op": "toggle"}"#.to_string(),
            unique_wrong,
        ));
        let checkpoints = Arc::new(MemoryCheckpointStore::new());
        let uc = RunTaskUseCase::new(ToggleThree, oracle, flat_five_config(), checkpoints);

        if let Ok(report) = uc.execute(Switchboard { flips: 0 }).await {
            assert_eq!(report.final_state.flips, 3);
            assert_eq!(report.steps_applied, 3);
            successes += 1;
        }
    }

    assert!(
        successes >= 990,
        "expected at least 990/1000 successful runs, got {successes}"
    );
}

async fn run_long_counter(target: i64) {
    // A 1% malformed rate delivered as three-call bursts, so whole rounds
    // sink now and then and the retry path gets exercised.
    let oracle = Arc::new(SimulatedOracle::new(|_prompt: &str, ordinal: u64| {
        if ordinal % 300 < 3 {
            Ok("```json\nnot really\n```".to_string())
        } else {
            Ok(r#"{"delta": 1}"#.to_string())
        }
    }));
    let checkpoints = Arc::new(MemoryCheckpointStore::new());
    let uc = RunTaskUseCase::new(
        CountTo { target },
        oracle,
        EngineConfig::default(),
        checkpoints.clone(),
    );

    let report = uc.execute(Counter { value: 0 }).await.unwrap();
    // Zero drift: exactly target applied steps, exact final value
    assert_eq!(report.final_state.value, target);
    assert_eq!(report.steps_applied, target as u64);
    assert!(report.total_retries > 0);
    assert_eq!(checkpoints.cursor(), Some(target as u64));
}

/// Long sequential run with intermittent garbage rounds: no accumulated
/// error over tens of thousands of steps.
#[tokio::test]
async fn test_long_run_has_zero_drift() {
    run_long_counter(65_535).await;
}

/// The full million-step scale. Slow; run with `cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn test_million_step_run_has_zero_drift() {
    run_long_counter(1_048_575).await;
}

/// Oracle that splits evenly between two well-formed answers on step 10 and
/// answers correctly everywhere else. `converge_after` bounds how many
/// step-10 invocations split before the oracle settles down (u64::MAX
/// never settles).
fn splitting_oracle(
    converge_after: u64,
) -> SimulatedOracle<impl Fn(&str, u64) -> Result<String, OracleError> + Send + Sync> {
    let step_ten_calls = AtomicU64::new(0);
    SimulatedOracle::new(move |prompt: &str, ordinal: u64| {
        if prompt.contains("(step 10)") && step_ten_calls.fetch_add(1, Ordering::SeqCst) < converge_after
        {
            if ordinal % 2 == 0 {
                Ok(r#"{"delta": 1}"#.to_string())
            } else {
                Ok(r#"{"delta": 2}"#.to_string())
            }
        } else {
            Ok(r#"{"delta": 1}"#.to_string())
        }
    })
}

/// Even k plus exact alternation keeps every round tied.
fn even_k_config() -> EngineConfig {
    EngineConfig::default().with_escalation(
        EscalationPolicy::default()
            .with_initial_k(4)
            .with_growth_factor(2)
            .with_max_k(8)
            .with_max_retries(2)
            .with_escalation_rounds(1),
    )
}

/// A persistent 50/50 split halts the task with state intact at the
/// contested step; nothing half-applied leaks into state or checkpoint.
#[tokio::test]
async fn test_persistent_split_aborts_with_state_intact() {
    let checkpoints = Arc::new(MemoryCheckpointStore::new());
    let uc = RunTaskUseCase::new(
        CountTo { target: 20 },
        Arc::new(splitting_oracle(u64::MAX)),
        even_k_config(),
        checkpoints.clone(),
    );

    let err = uc.execute(Counter { value: 0 }).await.unwrap_err();
    match err {
        RunTaskError::Fatal(fatal) => {
            assert_eq!(fatal.cursor, 10);
            // 1 initial round + 2 retries + 1 escalation round, all failed
            assert_eq!(fatal.retries, 4);
            assert!(fatal.reason.contains("tie"), "reason: {}", fatal.reason);
        }
        other => panic!("expected fatal abort, got {other:?}"),
    }
    // The ten applied steps are still durable and uncorrupted
    assert_eq!(checkpoints.cursor(), Some(10));
    let checkpoint = checkpoints.load().unwrap().unwrap();
    assert_eq!(checkpoint.state.value, 10);
}

/// The same split resolves if the oracle converges within the retry
/// budget: two burned retries, then completion.
#[tokio::test]
async fn test_transient_split_resolves_after_retries() {
    let checkpoints = Arc::new(MemoryCheckpointStore::new());
    // Rounds at step 10 issue k=4 then k=8; converge after those 12 calls
    let uc = RunTaskUseCase::new(
        CountTo { target: 20 },
        Arc::new(splitting_oracle(12)),
        even_k_config(),
        checkpoints.clone(),
    );

    let report = uc.execute(Counter { value: 0 }).await.unwrap();
    assert_eq!(report.final_state.value, 20);
    assert_eq!(report.total_retries, 2);
    assert_eq!(checkpoints.cursor(), Some(20));
}

/// Kill a run mid-task via the step limit, then resume from the durable
/// file checkpoint and finish.
#[tokio::test]
async fn test_resume_from_file_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.checkpoint.json");

    let interrupted = RunTaskUseCase::new(
        CountTo { target: 10 },
        Arc::new(SimulatedOracle::new(|p: &str, o: u64| Ok(correct(p, o)))),
        EngineConfig::default()
            .with_execution(ExecutionParams::default().with_max_steps(Some(4))),
        Arc::new(FileCheckpointStore::new(&path)),
    );
    let err = interrupted.execute(Counter { value: 0 }).await.unwrap_err();
    assert!(matches!(err, RunTaskError::StepLimitExceeded(4)));

    let resumed = RunTaskUseCase::new(
        CountTo { target: 10 },
        Arc::new(SimulatedOracle::new(|p: &str, o: u64| Ok(correct(p, o)))),
        EngineConfig::default(),
        Arc::new(FileCheckpointStore::new(&path)),
    );
    let report = resumed.resume(Counter { value: 0 }).await.unwrap();

    assert_eq!(report.final_state.value, 10);
    assert_eq!(report.steps_applied, 10);
    // Only the remaining six steps ran in the second process
    assert_eq!(report.audit.len(), 6);

    let store: FileCheckpointStore<Counter> = FileCheckpointStore::new(&path);
    assert_eq!(store.load().unwrap().unwrap().cursor, 10);
}

/// Every resolved step lands in the JSONL outcome log.
#[tokio::test]
async fn test_outcome_log_records_every_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.outcomes.jsonl");
    let log = Arc::new(JsonlOutcomeLog::new(&path).unwrap());

    let uc = RunTaskUseCase::new(
        CountTo { target: 3 },
        Arc::new(SimulatedOracle::new(|p: &str, o: u64| Ok(correct(p, o)))),
        EngineConfig::default(),
        Arc::new(MemoryCheckpointStore::new()),
    )
    .with_outcome_log(log);

    uc.execute(Counter { value: 0 }).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.trim().lines().collect();
    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(record["status"], "applied");
        assert_eq!(record["cursor"], i as u64);
    }
}
