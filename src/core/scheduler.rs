//! Frame scheduling.
//!
//! Animation and visibility checks never call a clock or a timer directly.
//! They ask a [`FrameScheduler`] for "the next frame" and get called back
//! with a timestamp when it arrives.  The runtime drives a [`FrameQueue`]
//! from its event loop; tests drive the same queue with hand-picked times.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Work that can be waiting on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTask {
    /// Advance the active scroll animation.
    Animate,
    /// Re-evaluate back-to-top visibility.
    CheckVisibility,
}

/// How frames are paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingStrategy {
    /// Fire on a fixed refresh grid (the display-refresh analogue).
    Frame { interval: Duration },
    /// Fire a fixed period after the request (timer fallback).
    Interval { period: Duration },
    /// No pacing at all; animations jump straight to their target.
    Immediate,
}

impl SchedulingStrategy {
    pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);
    pub const DEFAULT_INTERVAL_PERIOD: Duration = Duration::from_millis(250);

    /// Short name used in the config file and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Frame { .. } => "frame",
            Self::Interval { .. } => "interval",
            Self::Immediate => "immediate",
        }
    }

    /// Human-readable label for the settings menu.
    pub fn label(self) -> String {
        match self {
            Self::Frame { interval } => format!("frame ({}ms)", interval.as_millis()),
            Self::Interval { period } => format!("interval ({}ms)", period.as_millis()),
            Self::Immediate => "immediate".into(),
        }
    }

    /// Next strategy in settings-menu order, keeping configured timings.
    pub fn cycle(self, frame_interval: Duration, interval_period: Duration) -> Self {
        match self {
            Self::Frame { .. } => Self::Interval {
                period: interval_period,
            },
            Self::Interval { .. } => Self::Immediate,
            Self::Immediate => Self::Frame {
                interval: frame_interval,
            },
        }
    }
}

impl Default for SchedulingStrategy {
    fn default() -> Self {
        Self::Frame {
            interval: Self::DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl fmt::Display for SchedulingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scheduling strategy `{0}` (expected frame, interval or immediate)")]
pub struct StrategyParseError(String);

impl FromStr for SchedulingStrategy {
    type Err = StrategyParseError;

    /// Parses the bare strategy name with default timings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frame" | "raf" => Ok(Self::default()),
            "interval" | "timer" => Ok(Self::Interval {
                period: Self::DEFAULT_INTERVAL_PERIOD,
            }),
            "immediate" | "none" => Ok(Self::Immediate),
            other => Err(StrategyParseError(other.to_string())),
        }
    }
}

/// Something that can call back on the next frame.
pub trait FrameScheduler {
    /// Ask for `task` to run on the next frame after `now`.
    /// Requesting a task that is already pending is a no-op.
    fn request_frame(&mut self, task: FrameTask, now: Duration);

    /// `false` when frames are not paced and animations should jump.
    fn paces_frames(&self) -> bool {
        true
    }
}

/// Deterministic frame queue driven by explicit timestamps.
#[derive(Debug)]
pub struct FrameQueue {
    strategy: SchedulingStrategy,
    pending: Vec<FrameTask>,
    deadline: Option<Duration>,
}

impl FrameQueue {
    pub fn new(strategy: SchedulingStrategy) -> Self {
        Self {
            strategy,
            pending: Vec::new(),
            deadline: None,
        }
    }

    /// Swap strategies.  Anything already pending fires at its old deadline.
    pub fn set_strategy(&mut self, strategy: SchedulingStrategy) {
        self.strategy = strategy;
    }

    /// When the next batch of tasks becomes due, if any are pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[cfg(test)]
    pub fn is_pending(&self, task: FrameTask) -> bool {
        self.pending.contains(&task)
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain every task due at `now`.  Returns the frame timestamp and the
    /// tasks in request order.  Requests made while the caller dispatches
    /// these tasks land in the next frame.
    pub fn take_due(&mut self, now: Duration) -> Option<(Duration, Vec<FrameTask>)> {
        let deadline = self.deadline?;
        if deadline > now {
            return None;
        }
        self.deadline = None;
        Some((now, std::mem::take(&mut self.pending)))
    }

    fn deadline_after(&self, now: Duration) -> Duration {
        match self.strategy {
            SchedulingStrategy::Frame { interval } => {
                let step = interval.as_nanos().max(1);
                let next = (now.as_nanos() / step + 1) * step;
                Duration::from_nanos(u64::try_from(next).unwrap_or(u64::MAX))
            }
            SchedulingStrategy::Interval { period } => now + period,
            SchedulingStrategy::Immediate => now,
        }
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, task: FrameTask, now: Duration) {
        if !self.pending.contains(&task) {
            self.pending.push(task);
        }
        if self.deadline.is_none() {
            self.deadline = Some(self.deadline_after(now));
        }
    }

    fn paces_frames(&self) -> bool {
        !matches!(self.strategy, SchedulingStrategy::Immediate)
    }
}
