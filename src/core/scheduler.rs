//! Cron-based scheduler that triggers refresh cycles

use crate::core::cycle::CycleRunner;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Cron expression firing every `interval_seconds` at an even cadence.
///
/// Cron format: second minute hour day month weekday. Only intervals that
/// divide a minute, an hour or a day evenly can be expressed, so 45s or 90s
/// are rejected rather than run at a drifting cadence.
pub fn cron_expression(interval_seconds: u64) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    if interval_seconds == 0 {
        return Err("Scheduler disabled: interval_seconds is 0".into());
    }

    let minutes = interval_seconds / 60;
    let hours = interval_seconds / 3600;
    if interval_seconds < 60 && 60 % interval_seconds == 0 {
        Ok(format!("*/{} * * * * *", interval_seconds))
    } else if interval_seconds % 60 == 0 && interval_seconds < 3600 && 60 % minutes == 0 {
        Ok(format!("0 */{} * * * *", minutes))
    } else if interval_seconds % 3600 == 0 && hours <= 24 && 24 % hours == 0 {
        Ok(format!("0 0 */{} * * *", hours))
    } else {
        Err(format!(
            "Refresh interval {}s cannot be scheduled evenly; use a divisor of 60s, 60min or 24h",
            interval_seconds
        )
        .into())
    }
}

/// Scheduler that periodically runs a refresh cycle
pub struct CycleScheduler {
    runner: Arc<CycleRunner>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl CycleScheduler {
    pub fn new(
        runner: Arc<CycleRunner>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let cron_expr = cron_expression(interval_seconds)?;

        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "CycleScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            runner,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler. Ticks missed while a cycle runs are skipped.
    pub async fn start(&self) {
        let runner = self.runner.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("CycleScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                debug!("CycleScheduler: cron tick");
                runner.run().await;
            }
        });

        let mut h = self.handle.write().await;
        if let Some(previous) = h.replace(handle) {
            previous.abort();
        }
        info!("CycleScheduler: started successfully");
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("CycleScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
