//! Attempt execution — the per-step fan-out.
//!
//! Issues `k` oracle invocations concurrently and joins them before
//! validation and voting proceed. This is the only concurrency point in the
//! system. Each invocation sees only the step contract: never prior
//! attempts, never task history, so one bad attempt cannot bias another.

use crate::config::AttemptParams;
use crate::ports::oracle::{Oracle, OracleError};
use std::sync::Arc;
use std::time::Instant;
use stepwise_domain::{Attempt, StepContract};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Fans out independent oracle invocations for one step.
pub struct AttemptExecutor<O: Oracle + 'static> {
    oracle: Arc<O>,
    params: AttemptParams,
}

impl<O: Oracle + 'static> AttemptExecutor<O> {
    pub fn new(oracle: Arc<O>, params: AttemptParams) -> Self {
        Self { oracle, params }
    }

    /// Run `k` invocations for the contract and collect whatever returned
    /// in time.
    ///
    /// Timed-out, cancelled, or transport-exhausted invocations contribute
    /// no attempt — absence, not rejection. The result may therefore hold
    /// fewer than `k` attempts; the attempted set size stays `k` for quorum
    /// purposes.
    pub async fn run(&self, contract: &StepContract, k: usize) -> Vec<Attempt> {
        let cancel = CancellationToken::new();
        let mut join_set = JoinSet::new();

        for index in 0..k {
            let oracle = Arc::clone(&self.oracle);
            let prompt = contract.instruction().to_string();
            let hint = contract.schema().hint();
            let params = self.params.clone();
            let cancel = cancel.clone();

            join_set.spawn(async move {
                run_attempt(oracle.as_ref(), index, &prompt, &hint, &params, &cancel).await
            });
        }

        let mut attempts = Vec::with_capacity(k);
        match self.params.round_timeout {
            Some(limit) => {
                let barrier = tokio::time::timeout(limit, drain(&mut join_set, &mut attempts));
                if barrier.await.is_err() {
                    debug!(step = %contract.id(), "join barrier deadline elapsed, cancelling outstanding attempts");
                    cancel.cancel();
                    // Workers observe cancellation promptly; collect the stragglers
                    drain(&mut join_set, &mut attempts).await;
                }
            }
            None => drain(&mut join_set, &mut attempts).await,
        }

        debug!(
            step = %contract.id(),
            issued = k,
            returned = attempts.len(),
            "attempt round joined"
        );
        attempts
    }
}

/// Collect finished attempts, keeping partial results across a timeout.
async fn drain(join_set: &mut JoinSet<Option<Attempt>>, attempts: &mut Vec<Attempt>) {
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Some(attempt)) => attempts.push(attempt),
            Ok(None) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!("attempt task join error: {e}"),
        }
    }
}

/// One attempt slot: invoke (with a short transport retry budget) under an
/// independent timeout, bailing out early if the round is cancelled.
async fn run_attempt<O: Oracle>(
    oracle: &O,
    index: usize,
    prompt: &str,
    hint: &str,
    params: &AttemptParams,
    cancel: &CancellationToken,
) -> Option<Attempt> {
    let started = Instant::now();
    let invocation = invoke_with_retries(oracle, prompt, hint, params.transport_retries);
    let bounded = tokio::time::timeout(params.attempt_timeout, invocation);

    tokio::select! {
        _ = cancel.cancelled() => {
            debug!(index, "attempt cancelled at join barrier");
            None
        }
        result = bounded => match result {
            Ok(Ok(raw)) => Some(Attempt::new(index, raw, started.elapsed())),
            Ok(Err(e)) => {
                warn!(index, error = %e, "attempt failed after transport retries");
                None
            }
            Err(_) => {
                debug!(index, "attempt timed out");
                None
            }
        }
    }
}

async fn invoke_with_retries<O: Oracle>(
    oracle: &O,
    prompt: &str,
    hint: &str,
    budget: usize,
) -> Result<String, OracleError> {
    let mut remaining = budget;
    loop {
        match oracle.invoke(prompt, hint).await {
            Ok(raw) => return Ok(raw),
            Err(e) if e.is_transport() && remaining > 0 => {
                remaining -= 1;
                debug!(error = %e, remaining, "transport error, retrying invocation");
            }
            Err(e) => return Err(e),
        }
    }
}
