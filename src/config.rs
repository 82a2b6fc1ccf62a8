//! Site configuration module.
//!
//! An optional `config.toml` in the source root tunes the polling schedule.
//! The file is not a page, so it is never copied into the destination.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [schedule]
//! idle_interval_secs = 120    # Baseline polling interval
//! active_interval_secs = 2    # Interval right after a change
//!
//! # After `quiet_secs` without a change, poll every `interval_secs`.
//! decay = [
//!   { quiet_secs = 600, interval_secs = 15 },
//!   { quiet_secs = 1200, interval_secs = 30 },
//!   { quiet_secs = 1800, interval_secs = 120 },
//! ]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: values not given fall back to the stock defaults.
//! A `decay` list replaces the default list as a whole.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Name of the config file looked up in the source root.
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Polling schedule.
    pub schedule: ScheduleConfig,
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule.validate()
    }
}

/// Polling intervals and the quiet-window staircase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Baseline interval when nothing has changed for a long time.
    pub idle_interval_secs: u64,
    /// Interval right after a pass that regenerated something.
    pub active_interval_secs: u64,
    /// Steps back towards the baseline, ascending by `quiet_secs`.
    pub decay: Vec<DecayStep>,
}

/// After `quiet_secs` without changes, poll every `interval_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecayStep {
    pub quiet_secs: u64,
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            idle_interval_secs: 2 * 60,
            active_interval_secs: 2,
            decay: vec![
                DecayStep {
                    quiet_secs: 10 * 60,
                    interval_secs: 15,
                },
                DecayStep {
                    quiet_secs: 20 * 60,
                    interval_secs: 30,
                },
                DecayStep {
                    quiet_secs: 30 * 60,
                    interval_secs: 2 * 60,
                },
            ],
        }
    }
}

impl ScheduleConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_secs)
    }

    pub fn active_interval(&self) -> Duration {
        Duration::from_secs(self.active_interval_secs)
    }

    /// Interval for a quiet window of length `quiet`, if any step is crossed.
    ///
    /// Only the highest crossed step applies. Crossing is strict: a window of
    /// exactly `quiet_secs` has not crossed that step yet.
    pub fn decayed_interval(&self, quiet: Duration) -> Option<Duration> {
        self.decay
            .iter()
            .rev()
            .find(|step| quiet > Duration::from_secs(step.quiet_secs))
            .map(|step| Duration::from_secs(step.interval_secs))
    }

    /// Validate intervals and the shape of the staircase.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_interval_secs == 0 || self.active_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "schedule intervals must be non-zero".into(),
            ));
        }
        if self.decay.is_empty() {
            return Err(ConfigError::Validation(
                "schedule.decay needs at least one step".into(),
            ));
        }
        if self.decay.iter().any(|s| s.interval_secs == 0) {
            return Err(ConfigError::Validation(
                "schedule.decay intervals must be non-zero".into(),
            ));
        }
        if self
            .decay
            .windows(2)
            .any(|pair| pair[0].quiet_secs >= pair[1].quiet_secs)
        {
            return Err(ConfigError::Validation(
                "schedule.decay must be strictly ascending by quiet_secs".into(),
            ));
        }
        if let Some(last) = self.decay.last()
            && last.interval_secs != self.idle_interval_secs
        {
            return Err(ConfigError::Validation(
                "the last schedule.decay step must return to idle_interval_secs".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load `config.toml` from `dir`, or the defaults if there is none.
///
/// Missing keys take their default through `#[serde(default)]`, so a sparse
/// file needs no explicit merge step. The result is validated.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let content = match fs::read_to_string(dir.join(CONFIG_FILE_NAME)) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SiteConfig::default()),
        Err(e) => return Err(e.into()),
    };
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pollsite configuration
# ======================
# Place this file in the source root. All settings are optional; values
# shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Polling schedule
# ---------------------------------------------------------------------------
# The source tree is re-scanned on a timer. Right after a pass that
# regenerated something, polling is fast; the longer nothing changes, the
# slower it gets, until it is back at the idle baseline.
[schedule]
# Baseline interval between passes, in seconds.
idle_interval_secs = 120

# Interval right after a change, in seconds.
active_interval_secs = 2

# Staircase back to the baseline: once the tree has been quiet for longer
# than `quiet_secs`, poll every `interval_secs`. Steps must be ascending and
# the last one must return to `idle_interval_secs`.
decay = [
  { quiet_secs = 600, interval_secs = 15 },
  { quiet_secs = 1200, interval_secs = 30 },
  { quiet_secs = 1800, interval_secs = 120 },
]
"##
}
