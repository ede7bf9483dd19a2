//! Background health probe and availability poller
//!
//! Both only touch the degraded flag and the availability set; failures are
//! logged and otherwise ignored.

use std::sync::Arc;

use concierge_client::ConciergeBackend;
use concierge_config::MonitorSettings;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::SessionState;

#[derive(Clone)]
pub struct BackgroundMonitor {
    backend: Arc<dyn ConciergeBackend>,
    state: Arc<SessionState>,
    settings: MonitorSettings,
}

impl BackgroundMonitor {
    pub fn new(
        backend: Arc<dyn ConciergeBackend>,
        state: Arc<SessionState>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            backend,
            state,
            settings,
        }
    }

    /// One health probe; failure sets the degraded flag
    pub async fn probe_health(&self) -> bool {
        match self.backend.health().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Health probe failed");
                self.state.set_degraded(true);
                false
            }
        }
    }

    /// One availability poll; success replaces the set and clears degraded
    pub async fn refresh_availability(&self) -> bool {
        match self.backend.availability().await {
            Ok(entries) => {
                let count = entries.len();
                self.state.replace_availability(entries);
                self.state.set_degraded(false);
                tracing::trace!(items = count, "Availability refreshed");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Availability poll failed");
                false
            }
        }
    }

    /// Start the fire-and-forget probe and the fixed-interval poller
    pub fn spawn(&self) -> MonitorHandle {
        let mut tasks = Vec::with_capacity(2);

        if self.settings.health_probe {
            let monitor = self.clone();
            tasks.push(tokio::spawn(async move {
                monitor.probe_health().await;
            }));
        }

        let monitor = self.clone();
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(monitor.settings.poll_interval());
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                monitor.refresh_availability().await;
            }
        }));

        tracing::info!(
            poll_secs = self.settings.availability_poll_secs,
            health_probe = self.settings.health_probe,
            "Background monitor started"
        );
        MonitorHandle { tasks }
    }
}

/// Aborts the background tasks when dropped
pub struct MonitorHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn shutdown(self) {
        // Drop aborts
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
