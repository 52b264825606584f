//! Liveness probing state machine.
//!
//! Each ping opens a quiet window. A failed ping inside its window flips
//! the signal to unhealthy; a window that closes without failure flips it
//! back to healthy. The driver lives in [`crate::components::heartbeat`].

/// Identity of one ping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PingId(u64);

/// How a ping request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PingOutcome {
    Responded,
    /// Network failure (`None`) or an error status
    Failed { status: Option<u16> },
}

#[derive(Debug)]
pub struct HeartbeatMonitor {
    healthy: bool,
    disabled: bool,
    issued: u64,
    open_window: Option<PingId>,
}

impl HeartbeatMonitor {
    pub fn new() -> Self {
        Self {
            healthy: true,
            disabled: false,
            issued: 0,
            open_window: None,
        }
    }

    #[cfg(test)]
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Set once the server reports that it does not implement probing.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn begin_ping(&mut self) -> PingId {
        self.issued += 1;
        let id = PingId(self.issued);
        self.open_window = Some(id);
        id
    }

    /// The quiet window of `id` elapsed. Returns the new health if it changed.
    pub fn window_elapsed(&mut self, id: PingId) -> Option<bool> {
        if self.open_window != Some(id) {
            return None;
        }
        self.open_window = None;
        self.set_healthy(true)
    }

    /// Ping `id` finished. Returns the new health if it changed.
    pub fn ping_finished(&mut self, id: PingId, outcome: PingOutcome) -> Option<bool> {
        match outcome {
            PingOutcome::Responded => None,
            PingOutcome::Failed {
                status: Some(404 | 501),
            } => {
                tracing::info!("liveness probing not supported, stopping");
                self.disabled = true;
                self.open_window = None;
                None
            }
            PingOutcome::Failed { status } => {
                if self.open_window != Some(id) {
                    return None;
                }
                tracing::debug!(?status, "liveness ping failed");
                self.open_window = None;
                self.set_healthy(false)
            }
        }
    }

    fn set_healthy(&mut self, healthy: bool) -> Option<bool> {
        if self.healthy == healthy {
            return None;
        }
        tracing::info!(healthy, "server liveness changed");
        self.healthy = healthy;
        Some(healthy)
    }
}

impl Default for HeartbeatMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOWN: PingOutcome = PingOutcome::Failed { status: None };

    #[test]
    fn test_failure_inside_window_marks_unhealthy() {
        let mut monitor = HeartbeatMonitor::new();
        let id = monitor.begin_ping();
        assert_eq!(monitor.ping_finished(id, DOWN), Some(false));
        assert!(!monitor.is_healthy());

        // Window already closed by the failure
        assert_eq!(monitor.window_elapsed(id), None);
        assert!(!monitor.is_healthy());
    }

    #[test]
    fn test_recovery_requires_quiet_window() {
        let mut monitor = HeartbeatMonitor::new();
        let first = monitor.begin_ping();
        monitor.ping_finished(first, DOWN);

        let second = monitor.begin_ping();
        assert!(!monitor.is_healthy());
        assert_eq!(monitor.window_elapsed(second), Some(true));
        assert!(monitor.is_healthy());

        // Already healthy: no further transition
        let third = monitor.begin_ping();
        assert_eq!(monitor.window_elapsed(third), None);
    }

    #[test]
    fn test_failure_after_window_is_ignored() {
        let mut monitor = HeartbeatMonitor::new();
        let id = monitor.begin_ping();
        monitor.window_elapsed(id);
        assert_eq!(
            monitor.ping_finished(id, PingOutcome::Failed { status: Some(502) }),
            None
        );
        assert!(monitor.is_healthy());
    }

    #[test]
    fn test_stale_window_ignored() {
        let mut monitor = HeartbeatMonitor::new();
        let old = monitor.begin_ping();
        let new = monitor.begin_ping();
        monitor.ping_finished(new, DOWN);
        assert_eq!(monitor.window_elapsed(old), None);
        assert!(!monitor.is_healthy());
    }

    #[test]
    fn test_unsupported_endpoint_disables() {
        for status in [404, 501] {
            let mut monitor = HeartbeatMonitor::new();
            let id = monitor.begin_ping();
            let outcome = PingOutcome::Failed {
                status: Some(status),
            };
            assert_eq!(monitor.ping_finished(id, outcome), None);
            assert!(monitor.is_disabled());
            assert!(monitor.is_healthy());
        }
    }

    #[test]
    fn test_response_keeps_window_open() {
        let mut monitor = HeartbeatMonitor::new();
        let id = monitor.begin_ping();
        monitor.ping_finished(id, DOWN);
        let id = monitor.begin_ping();
        assert_eq!(monitor.ping_finished(id, PingOutcome::Responded), None);
        assert_eq!(monitor.window_elapsed(id), Some(true));
    }
}
