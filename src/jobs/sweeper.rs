//! Background recovery for generation runs that died mid-flight.
//!
//! A crash between the `generating` claim and the terminal transition would
//! otherwise leave the session stuck forever, with every retry rejected as
//! already in progress. The sweeper re-arms those sessions to `failed` once
//! they exceed the deadline, which makes them retryable again.

use std::time::Duration;

use crate::repository::SessionRepository;
use crate::telemetry::metrics::STUCK_SESSIONS_SWEPT;

pub async fn run_sweeper(sessions: SessionRepository, interval_secs: u64, deadline_secs: i64) {
    tracing::info!(interval_secs, deadline_secs, "Stuck-session sweeper started");

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match sessions.sweep_stuck(deadline_secs).await {
            Ok(0) => {}
            Ok(swept) => {
                STUCK_SESSIONS_SWEPT.add(swept, &[]);
                tracing::warn!(swept, "Re-armed sessions stuck in generating");
            }
            Err(err) => {
                tracing::error!(error = %err, "Stuck-session sweep failed");
            }
        }
    }
}
