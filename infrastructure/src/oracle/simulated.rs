//! Simulated oracle with scripted behavior.
//!
//! Drives the engine without a live model: the behavior closure sees the
//! prompt and a global invocation ordinal, so tests can script accuracy
//! levels, colluding or non-colluding wrong answers, malformed output, and
//! transport failures deterministically.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use stepwise_application::{Oracle, OracleError};

/// Oracle whose responses come from a scripted behavior closure.
pub struct SimulatedOracle<F>
where
    F: Fn(&str, u64) -> Result<String, OracleError> + Send + Sync,
{
    behavior: F,
    calls: AtomicU64,
    latency: Option<Duration>,
}

impl<F> SimulatedOracle<F>
where
    F: Fn(&str, u64) -> Result<String, OracleError> + Send + Sync,
{
    pub fn new(behavior: F) -> Self {
        Self {
            behavior,
            calls: AtomicU64::new(0),
            latency: None,
        }
    }

    /// Add a fixed latency to every invocation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Total invocations so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> Oracle for SimulatedOracle<F>
where
    F: Fn(&str, u64) -> Result<String, OracleError> + Send + Sync,
{
    async fn invoke(&self, prompt: &str, _schema_hint: &str) -> Result<String, OracleError> {
        let ordinal = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        (self.behavior)(prompt, ordinal)
    }
}

/// Build an oracle that answers correctly with probability `accuracy`.
///
/// Each invocation draws from an rng seeded by `(seed, ordinal)`, so a
/// given seed replays the exact same answer sequence regardless of attempt
/// scheduling order. `correct` and `wrong` both see the prompt and the
/// ordinal; a `wrong` closure that folds the ordinal into its answer
/// produces non-colluding wrong attempts.
pub fn unreliable<C, W>(
    seed: u64,
    accuracy: f64,
    correct: C,
    wrong: W,
) -> SimulatedOracle<impl Fn(&str, u64) -> Result<String, OracleError> + Send + Sync>
where
    C: Fn(&str, u64) -> String + Send + Sync,
    W: Fn(&str, u64) -> String + Send + Sync,
{
    let accuracy = accuracy.clamp(0.0, 1.0);
    SimulatedOracle::new(move |prompt, ordinal| {
        let mut rng = StdRng::seed_from_u64(seed ^ ordinal.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        if rng.random_bool(accuracy) {
            Ok(correct(prompt, ordinal))
        } else {
            Ok(wrong(prompt, ordinal))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_behavior_sees_global_ordinal() {
        let oracle = SimulatedOracle::new(|_, ordinal| Ok(format!("call {ordinal}")));
        assert_eq!(oracle.invoke("p", "h").await.unwrap(), "call 0");
        assert_eq!(oracle.invoke("p", "h").await.unwrap(), "call 1");
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_unreliable_extremes() {
        let always = unreliable(7, 1.0, |_, _| "right".to_string(), |_, _| "wrong".to_string());
        let never = unreliable(7, 0.0, |_, _| "right".to_string(), |_, _| "wrong".to_string());

        for _ in 0..20 {
            assert_eq!(always.invoke("p", "h").await.unwrap(), "right");
            assert_eq!(never.invoke("p", "h").await.unwrap(), "wrong");
        }
    }

    #[tokio::test]
    async fn test_unreliable_is_deterministic_per_seed() {
        let run = |seed: u64| async move {
            let oracle = unreliable(
                seed,
                0.5,
                |_, _| "right".to_string(),
                |_, _| "wrong".to_string(),
            );
            let mut answers = Vec::new();
            for _ in 0..32 {
                answers.push(oracle.invoke("p", "h").await.unwrap());
            }
            answers
        };

        assert_eq!(run(11).await, run(11).await);
        assert_ne!(run(11).await, run(12).await);
    }

    #[tokio::test]
    async fn test_transport_failures_can_be_scripted() {
        let oracle = SimulatedOracle::new(|_, ordinal| {
            if ordinal == 0 {
                Err(OracleError::ConnectionError("reset".to_string()))
            } else {
                Ok("ok".to_string())
            }
        });
        assert!(oracle.invoke("p", "h").await.is_err());
        assert_eq!(oracle.invoke("p", "h").await.unwrap(), "ok");
    }
}
