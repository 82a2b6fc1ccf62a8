//! Continuous site generation.
//!
//! [`generate_site`] runs a first pass on the calling thread, so the
//! destination is current when it returns, then hands the tree to a worker
//! thread that keeps re-walking it on the adaptive schedule. Passes never
//! overlap: the next delay starts only after the previous pass and its error
//! callback have returned.
//!
//! The returned [`SiteHandle`] stops the loop. Stopping never interrupts a
//! pass that is already running; it only prevents the next one. Dropping the
//! handle also stops the loop, without waiting for the worker.

use crate::config::ScheduleConfig;
use crate::schedule::ScheduleState;
use crate::walk::{self, PassReport, WalkError};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One source tree mirrored into one destination tree, with its schedule.
#[derive(Debug)]
pub struct SiteGenerator {
    source: PathBuf,
    dest: PathBuf,
    schedule: ScheduleState,
}

impl SiteGenerator {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>, config: ScheduleConfig) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            schedule: ScheduleState::new(config, Instant::now()),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn schedule(&self) -> &ScheduleState {
        &self.schedule
    }

    /// Run one pass and fold its outcome into the schedule.
    pub fn run_pass(&mut self) -> Result<PassReport, WalkError> {
        let mut report = PassReport::default();
        match walk::walk_into(&self.source, &self.dest, &mut report) {
            Ok(()) => {
                self.schedule.record_success(&report, Instant::now());
                debug!(
                    regenerated = report.regenerated.len(),
                    up_to_date = report.up_to_date,
                    next_pass_in = ?self.schedule.interval(),
                    "pass complete"
                );
                Ok(report)
            }
            Err(e) => {
                self.schedule.record_failure(&report);
                warn!(error = %e, next_pass_in = ?self.schedule.interval(), "pass failed");
                Err(e)
            }
        }
    }

    /// Delay before the next pass.
    pub fn next_delay(&self) -> Duration {
        self.schedule.interval()
    }
}

/// Stops a running generator.
#[derive(Debug)]
pub struct SiteHandle {
    stop: Sender<()>,
    worker: thread::JoinHandle<()>,
}

impl SiteHandle {
    /// Stop scheduling passes and wait for the worker to finish.
    ///
    /// A pass in flight runs to completion first.
    pub fn stop(self) {
        // The worker may already be gone if its thread panicked; the join
        // below reports that.
        let _ = self.stop.send(());
        if self.worker.join().is_err() {
            warn!("site generator worker panicked");
        }
    }

    /// Block until the generator stops. It only stops on its own if the
    /// worker panics, so in practice this runs for the life of the process.
    pub fn wait(self) {
        // Dropping the sender would disconnect the worker and end the loop.
        let SiteHandle {
            stop: _stop,
            worker,
        } = self;
        if worker.join().is_err() {
            warn!("site generator worker panicked");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }
}

/// Generate `source` into `dest` now, then keep it fresh in the background
/// with the default schedule.
///
/// `on_error` is called with every failed pass, the first one included; the
/// loop carries on after a failure.
pub fn generate_site<F>(source: &Path, dest: &Path, on_error: F) -> io::Result<SiteHandle>
where
    F: FnMut(&WalkError) + Send + 'static,
{
    generate_site_with(source, dest, ScheduleConfig::default(), on_error)
}

/// [`generate_site`] with an explicit schedule.
pub fn generate_site_with<F>(
    source: &Path,
    dest: &Path,
    config: ScheduleConfig,
    mut on_error: F,
) -> io::Result<SiteHandle>
where
    F: FnMut(&WalkError) + Send + 'static,
{
    let mut generator = SiteGenerator::new(source, dest, config);
    if let Err(e) = generator.run_pass() {
        on_error(&e);
    }

    let (stop, stop_rx) = mpsc::channel::<()>();
    let worker = thread::Builder::new()
        .name("pollsite-generator".to_owned())
        .spawn(move || {
            loop {
                match stop_rx.recv_timeout(generator.next_delay()) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                if let Err(e) = generator.run_pass() {
                    on_error(&e);
                }
            }
            debug!(source = %generator.source().display(), "site generator stopped");
        })?;

    Ok(SiteHandle { stop, worker })
}
