use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::instrument;

use crate::repository::RateLimitStore;
use crate::telemetry::metrics::RATE_LIMIT_DENIED;

/// Sliding-window request governor over a durable attempt log.
///
/// Availability over strictness: if the store is unreachable the check fails
/// open and the request proceeds. The count-then-insert pair is not atomic,
/// so a burst of concurrent requests can overshoot `max` by the concurrency
/// depth; acceptable for abuse deterrence, not for hard quotas.
#[derive(Clone)]
pub struct RateLimiter {
    attempts: Arc<dyn RateLimitStore>,
}

/// Composite log key: route prefix plus client identity.
pub fn client_key(prefix: &str, client: &str) -> String {
    format!("{prefix}:{client}")
}

impl RateLimiter {
    pub fn new(attempts: Arc<dyn RateLimitStore>) -> Self {
        Self { attempts }
    }

    /// Re-evaluates the trailing window on every call. Denials write
    /// nothing; allowed calls append an attempt, and roughly 1% of them also
    /// drop entries older than ten windows so the log garbage-collects
    /// itself without a scheduled task.
    #[instrument(name = "rate_limit.check", skip(self))]
    pub async fn check(&self, prefix: &str, client: &str, max: i64, window: Duration) -> bool {
        let key = client_key(prefix, client);
        let now = Utc::now();

        let result: Result<bool, sqlx::Error> = async {
            let count = self.attempts.count_since(&key, now - window).await?;
            if count >= max {
                return Ok(false);
            }

            self.attempts.record(&key).await?;

            if fastrand::f64() < 0.01 {
                let purged = self.attempts.purge_older_than(now - window * 10).await?;
                if purged > 0 {
                    tracing::debug!(purged, "Pruned stale rate-limit attempts");
                }
            }

            Ok(true)
        }
        .await;

        match result {
            Ok(true) => true,
            Ok(false) => {
                RATE_LIMIT_DENIED.add(1, &[]);
                tracing::warn!(key, max, "Rate limit exceeded");
                false
            }
            Err(err) => {
                // Fail open: the governor protects against abuse, it must
                // not turn a store outage into a site outage.
                tracing::warn!(key, error = %err, "Rate-limit store unreachable, allowing request");
                true
            }
        }
    }
}
