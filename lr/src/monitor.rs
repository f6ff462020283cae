//! Poll loop controller
//!
//! The host owns the timer. It calls [`PollController::tick`] on every
//! firing and passes the current time in, so the controller never sleeps or
//! spawns anything. A tick either deregisters (monitoring was switched off),
//! skips (undo in flight or the host could not be read), throttles (checked
//! too recently) or evaluates the current stage once.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::host::Host;
use crate::progress::LessonSession;
use crate::validators::Validation;

/// Why a tick was skipped without evaluating
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum SkipReason {
    /// The host is in the middle of an undo/redo step
    UndoInProgress,
    /// Reading the undo flag failed
    HostFault(String),
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tick", rename_all = "kebab-case")]
pub enum TickOutcome {
    /// Monitoring is off; the host should stop firing
    Deregistered,
    Skipped { reason: SkipReason },
    /// Last evaluation was too recent
    Throttled,
    Checked {
        validation: Validation,
        /// This evaluation flipped `stage_complete` from false to true
        newly_complete: bool,
    },
}

/// Time-gated trigger that re-evaluates the current stage
#[derive(Debug, Clone)]
pub struct PollController {
    min_check_interval: Duration,
    last_check: Instant,
    armed: bool,
}

impl PollController {
    /// Arm the controller; the first evaluation waits a full check interval
    pub fn start(config: &MonitorConfig, now: Instant) -> Self {
        debug!(
            min_check_interval_ms = config.min_check_interval_ms,
            "PollController::start: called"
        );
        Self {
            min_check_interval: config.min_check_interval(),
            last_check: now,
            armed: true,
        }
    }

    /// False once the controller has deregistered
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Handle one timer firing
    pub fn tick(&mut self, now: Instant, session: &mut LessonSession, host: &dyn Host) -> TickOutcome {
        if !self.armed || !session.state().monitoring_active {
            if self.armed {
                info!(key = %session.state().key(), "Monitoring stopped");
            }
            self.armed = false;
            return TickOutcome::Deregistered;
        }

        match host.is_undo_in_progress() {
            Ok(true) => {
                debug!("PollController::tick: undo in progress, skipping");
                return TickOutcome::Skipped {
                    reason: SkipReason::UndoInProgress,
                };
            }
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Poll tick could not read undo state");
                return TickOutcome::Skipped {
                    reason: SkipReason::HostFault(e.to_string()),
                };
            }
        }

        if now.saturating_duration_since(self.last_check) <= self.min_check_interval {
            return TickOutcome::Throttled;
        }

        let was_complete = session.state().stage_complete;
        let validation = session.validate_stage(host);
        self.last_check = now;
        let newly_complete = !was_complete && session.state().stage_complete;
        debug!(status = %validation.status, %newly_complete, "PollController::tick: checked");

        TickOutcome::Checked {
            validation,
            newly_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;
    use crate::validators::ValidationStatus;

    const TICK: Duration = Duration::from_millis(100);

    fn armed() -> (PollController, LessonSession, SimulatedHost, Instant) {
        let mut session = LessonSession::standard();
        let mut host = SimulatedHost::new();
        session.setup_stage(&mut host).unwrap();
        let start = Instant::now();
        let controller = PollController::start(&MonitorConfig::default(), start);
        (controller, session, host, start)
    }

    #[test]
    fn test_throttles_until_interval_passes() {
        let (mut controller, mut session, host, start) = armed();

        assert_eq!(controller.tick(start + TICK, &mut session, &host), TickOutcome::Throttled);
        // exactly the interval is still too soon
        assert_eq!(
            controller.tick(start + 2 * TICK, &mut session, &host),
            TickOutcome::Throttled
        );

        let outcome = controller.tick(start + 3 * TICK, &mut session, &host);
        assert!(matches!(
            outcome,
            TickOutcome::Checked {
                newly_complete: true,
                ..
            }
        ));
        assert!(session.state().stage_complete);
    }

    #[test]
    fn test_completion_reported_once() {
        let (mut controller, mut session, host, start) = armed();
        controller.tick(start + 3 * TICK, &mut session, &host);

        let outcome = controller.tick(start + 6 * TICK, &mut session, &host);
        match outcome {
            TickOutcome::Checked {
                validation,
                newly_complete,
            } => {
                assert!(validation.is_complete());
                assert!(!newly_complete);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_skips_during_undo() {
        let (mut controller, mut session, mut host, start) = armed();
        host.set_undo_in_progress(true);

        let outcome = controller.tick(start + 10 * TICK, &mut session, &host);
        assert_eq!(
            outcome,
            TickOutcome::Skipped {
                reason: SkipReason::UndoInProgress
            }
        );
        assert!(!session.state().stage_complete);

        host.set_undo_in_progress(false);
        let outcome = controller.tick(start + 11 * TICK, &mut session, &host);
        assert!(matches!(outcome, TickOutcome::Checked { .. }));
    }

    #[test]
    fn test_host_fault_skips_tick() {
        let (mut controller, mut session, mut host, start) = armed();
        host.inject_fault("mesh freed");

        let outcome = controller.tick(start + 10 * TICK, &mut session, &host);
        assert!(matches!(
            outcome,
            TickOutcome::Skipped {
                reason: SkipReason::HostFault(_)
            }
        ));
        assert!(controller.is_armed());
    }

    #[test]
    fn test_deregisters_when_monitoring_off() {
        let (mut controller, mut session, host, start) = armed();
        session.advance_stage().unwrap();

        assert_eq!(
            controller.tick(start + TICK, &mut session, &host),
            TickOutcome::Deregistered
        );
        assert!(!controller.is_armed());

        // stays down even if a later setup re-arms monitoring
        let mut host = host;
        session.setup_stage(&mut host).unwrap();
        assert_eq!(
            controller.tick(start + 10 * TICK, &mut session, &host),
            TickOutcome::Deregistered
        );
    }

    #[test]
    fn test_incomplete_check_keeps_polling() {
        let (mut controller, mut session, mut host, start) = armed();
        host.deselect();

        let outcome = controller.tick(start + 3 * TICK, &mut session, &host);
        match outcome {
            TickOutcome::Checked { validation, .. } => {
                assert_eq!(validation.status, ValidationStatus::Incomplete);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(controller.is_armed());
    }
}
