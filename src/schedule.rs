//! Adaptive polling schedule.
//!
//! Without filesystem notifications the only way to notice edits is to look
//! again. Looking every two seconds forever wastes the machine; looking every
//! two minutes makes someone editing a page wait. The schedule polls fast
//! right after a change and slows down in steps while the tree stays quiet:
//!
//! ```text
//! change ─▶ 2s ──(quiet > 10 min)─▶ 15s ──(> 20 min)─▶ 30s ──(> 30 min)─▶ 2 min (idle)
//!   ▲                                                                     │
//!   └────────────────────────── any stale page ◀──────────────────────────┘
//! ```
//!
//! Any pass that finds a stale page drops back to the fast interval and
//! restarts the quiet-window clock. A failed pass resets to the idle interval.
//! The intervals come from [`ScheduleConfig`]; the diagram shows the defaults.
//!
//! [`ScheduleState`] is a plain value owned by one generator. Nothing here is
//! global, so several generators (or tests) never see each other's state.

use crate::config::ScheduleConfig;
use crate::walk::PassReport;
use std::time::{Duration, Instant};

/// Polling state carried from one pass to the next.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    config: ScheduleConfig,
    interval: Duration,
    window_start: Instant,
    changed: bool,
}

impl ScheduleState {
    /// Start at the idle interval with the change flag raised, so the first
    /// successful pass opens an acceleration window.
    pub fn new(config: ScheduleConfig, now: Instant) -> Self {
        let interval = config.idle_interval();
        Self {
            config,
            interval,
            window_start: now,
            changed: true,
        }
    }

    /// Delay before the next pass.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the current quiet window started.
    pub fn window_start(&self) -> Instant {
        self.window_start
    }

    /// Whether a change is pending that the next successful pass will act on.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn is_idle(&self) -> bool {
        self.interval == self.config.idle_interval()
    }

    /// Note that a stale page was found during the current pass.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Fold a completed pass into the schedule.
    pub fn record_success(&mut self, report: &PassReport, now: Instant) {
        if report.changed() {
            self.mark_changed();
        }

        if self.changed {
            self.interval = self.config.active_interval();
            self.window_start = now;
            self.changed = false;
        } else if !self.is_idle() {
            let quiet = now.saturating_duration_since(self.window_start);
            if let Some(decayed) = self.config.decayed_interval(quiet) {
                self.interval = decayed;
            }
        }
    }

    /// Fold a failed pass into the schedule.
    ///
    /// A change noted before the failure stays pending.
    pub fn record_failure(&mut self, report: &PassReport) {
        if report.changed() {
            self.mark_changed();
        }
        self.interval = self.config.idle_interval();
    }
}
