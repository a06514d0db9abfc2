use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Runs `work` detached from the request, giving up after `limit`.
///
/// Failures and timeouts are logged at `warn` and never retried. The caller
/// does not wait for the outcome.
pub fn spawn_best_effort<F, E>(label: &'static str, limit: Duration, work: F)
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        match tokio::time::timeout(limit, work).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(task = label, error = %e, "Background task failed"),
            Err(_) => warn!(task = label, limit_ms = limit.as_millis() as u64, "Background task timed out"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_runs_detached() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        spawn_best_effort("flag", Duration::from_secs(1), async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<(), String>(())
        });

        for _ in 0..50 {
            if ran.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failure_does_not_propagate() {
        spawn_best_effort("fails", Duration::from_secs(1), async {
            Err::<(), _>("boom".to_string())
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
