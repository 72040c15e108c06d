//! Task orchestration — the single driver loop.
//!
//! Owns the state store exclusively and runs the fixed per-step pipeline:
//! decompose, fan out attempts, validate, vote, apply-or-retry, checkpoint.
//! Only validated, quorum-winning, domain-accepted actions ever touch state,
//! so per-step error cannot accumulate across a long task.

use crate::config::EngineConfig;
use crate::ports::checkpoint_store::{CheckpointStore, CheckpointStoreError};
use crate::ports::oracle::Oracle;
use crate::ports::outcome_log::{NoOutcomeLog, OutcomeLog};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::run_attempts::AttemptExecutor;
use std::sync::Arc;
use stepwise_domain::{
    AuditTrail, Decomposer, Directive, EscalationController, NextStep, StateStore, StepContract,
    StepId, StepOutcome, TaskState, ValidationVerdict, check, decide,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A step exhausted its retry and escalation budget.
///
/// The task halts with state intact at the last applied step; the checkpoint
/// still reflects every applied step, so a later resume sees no corruption.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("task aborted at step {step_id} (cursor {cursor}) after {retries} failed rounds: {reason}")]
pub struct FatalTaskError {
    pub step_id: StepId,
    pub cursor: u64,
    /// Failed rounds consumed before the abort.
    pub retries: usize,
    pub reason: String,
}

/// Errors that halt a task run.
#[derive(Error, Debug)]
pub enum RunTaskError {
    #[error(transparent)]
    Fatal(#[from] FatalTaskError),

    /// A checkpoint write failed. Fatal: continuing would break the
    /// invariant that applied state is always durable.
    #[error("checkpoint failure: {0}")]
    Checkpoint(#[from] CheckpointStoreError),

    #[error("step limit {0} reached without task completion")]
    StepLimitExceeded(u64),
}

/// Summary of a completed task run.
#[derive(Debug, Clone)]
pub struct TaskReport<S: TaskState> {
    /// State at the moment the decomposer signalled completion.
    pub final_state: S,
    /// Total applied steps (the final cursor, including any resumed prefix).
    pub steps_applied: u64,
    /// Failed rounds consumed across all steps of this run.
    pub total_retries: usize,
    /// Recent step outcomes (bounded; durable audit is the outcome log).
    pub audit: AuditTrail,
}

/// Drives one task from initial state to completion.
pub struct RunTaskUseCase<S, D, O>
where
    S: TaskState,
    D: Decomposer<S>,
    O: Oracle + 'static,
{
    decomposer: D,
    executor: AttemptExecutor<O>,
    config: EngineConfig,
    checkpoints: Arc<dyn CheckpointStore<S>>,
    outcome_log: Arc<dyn OutcomeLog>,
}

impl<S, D, O> RunTaskUseCase<S, D, O>
where
    S: TaskState,
    D: Decomposer<S>,
    O: Oracle + 'static,
{
    pub fn new(
        decomposer: D,
        oracle: Arc<O>,
        config: EngineConfig,
        checkpoints: Arc<dyn CheckpointStore<S>>,
    ) -> Self {
        let executor = AttemptExecutor::new(oracle, config.attempts.clone());
        Self {
            decomposer,
            executor,
            config,
            checkpoints,
            outcome_log: Arc::new(NoOutcomeLog),
        }
    }

    pub fn with_outcome_log(mut self, log: Arc<dyn OutcomeLog>) -> Self {
        self.outcome_log = log;
        self
    }

    /// Run a fresh task from `initial` at cursor 0.
    pub async fn execute(&self, initial: S) -> Result<TaskReport<S>, RunTaskError> {
        self.drive(StateStore::new(initial), &NoProgress).await
    }

    /// Run a fresh task, reporting progress through `progress`.
    pub async fn execute_with_progress(
        &self,
        initial: S,
        progress: &dyn ProgressNotifier,
    ) -> Result<TaskReport<S>, RunTaskError> {
        self.drive(StateStore::new(initial), progress).await
    }

    /// Resume from the stored checkpoint, or start from `fallback` if none
    /// was ever written.
    pub async fn resume(&self, fallback: S) -> Result<TaskReport<S>, RunTaskError> {
        let store = match self.checkpoints.load()? {
            Some(checkpoint) => {
                info!(cursor = checkpoint.cursor, "resuming from checkpoint");
                StateStore::restore(checkpoint).map_err(CheckpointStoreError::from)?
            }
            None => StateStore::new(fallback),
        };
        self.drive(store, &NoProgress).await
    }

    async fn drive(
        &self,
        mut store: StateStore<S>,
        progress: &dyn ProgressNotifier,
    ) -> Result<TaskReport<S>, RunTaskError> {
        // Durable from the very first step, so a crash before any step
        // applied still resumes cleanly.
        self.checkpoints.save(&store.checkpoint())?;

        let mut audit = AuditTrail::new(self.config.execution.audit_capacity);
        let mut steps_this_run: u64 = 0;

        loop {
            if let Some(max) = self.config.execution.max_steps
                && steps_this_run >= max
            {
                return Err(RunTaskError::StepLimitExceeded(max));
            }

            let contract = match self.decomposer.next(store.current(), store.cursor()) {
                NextStep::Complete => {
                    info!(
                        cursor = store.cursor(),
                        total_retries = audit.total_retries(),
                        "task complete"
                    );
                    progress.on_task_complete(store.cursor());
                    return Ok(TaskReport {
                        final_state: store.current().clone(),
                        steps_applied: store.cursor(),
                        total_retries: audit.total_retries(),
                        audit,
                    });
                }
                NextStep::Step(contract) => contract,
            };

            progress.on_step_start(contract.id(), store.cursor());
            let outcome = self.resolve_step(&contract, &mut store, progress).await;
            self.outcome_log.append(&outcome);
            progress.on_step_resolved(&outcome);
            let applied = outcome.is_applied();
            audit.push(outcome.clone());

            if applied {
                steps_this_run += 1;
                self.checkpoints.save(&store.checkpoint())?;
            } else {
                let reason = match outcome.status {
                    stepwise_domain::StepStatus::Failed { reason } => reason,
                    stepwise_domain::StepStatus::Applied { .. } => unreachable!(),
                };
                return Err(FatalTaskError {
                    step_id: outcome.step_id,
                    cursor: outcome.cursor,
                    retries: outcome.retries,
                    reason,
                }
                .into());
            }
        }
    }

    /// Run one step's voting rounds to a terminal outcome.
    ///
    /// Infallible by construction: every path ends in an applied or failed
    /// outcome within `EscalationPolicy::max_rounds` rounds. State is only
    /// mutated on the applied path.
    async fn resolve_step(
        &self,
        contract: &StepContract,
        store: &mut StateStore<S>,
        progress: &dyn ProgressNotifier,
    ) -> StepOutcome {
        let mut controller = EscalationController::new(self.config.escalation.clone());
        let mut round = 0usize;

        loop {
            let k = controller.begin_round();
            round += 1;
            progress.on_round(contract.id(), round, k);
            debug!(step = %contract.id(), round, k, "issuing voting round");

            let attempts = self.executor.run(contract, k).await;
            let verdicts: Vec<ValidationVerdict> = attempts
                .iter()
                .map(|attempt| check(attempt, contract.schema()))
                .collect();
            let result = decide(&verdicts, k, &self.config.voting.rule);
            let support = result.support();

            match controller.on_vote(&result) {
                Directive::Apply(action) => match store.apply(&action) {
                    Ok(_) => {
                        debug!(step = %contract.id(), round, support, "action applied");
                        return StepOutcome::applied(
                            contract.id().clone(),
                            contract.cursor(),
                            action,
                            support,
                            controller.retries(),
                        );
                    }
                    Err(e) => {
                        // The consensus answer is domain-invalid; same
                        // treatment as a failed vote.
                        warn!(step = %contract.id(), round, error = %e, "consensus action rejected by domain");
                        if controller.on_apply_rejected() == Directive::Abort {
                            return StepOutcome::failed(
                                contract.id().clone(),
                                contract.cursor(),
                                format!("consensus action rejected by domain: {e}"),
                                controller.retries(),
                            );
                        }
                    }
                },
                Directive::Retry { k: next_k } => {
                    debug!(step = %contract.id(), round, next_k, "no consensus, retrying");
                }
                Directive::Abort => {
                    let reason = match &result {
                        stepwise_domain::VoteResult::NoConsensus { reason } => {
                            format!("no consensus after {round} rounds: {reason}")
                        }
                        stepwise_domain::VoteResult::Win { .. } => unreachable!(),
                    };
                    warn!(step = %contract.id(), round, "step aborted: {reason}");
                    return StepOutcome::failed(
                        contract.id().clone(),
                        contract.cursor(),
                        reason,
                        controller.retries(),
                    );
                }
            }
        }
    }
}
