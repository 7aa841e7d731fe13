use std::fmt;
use std::time::{Duration, Instant};

use clap::ValueEnum;

/// Game speed presets; each maps to a fixed tick interval.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All presets in cycle order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Milliseconds between ticks.
    #[must_use]
    pub fn tick_interval_ms(self) -> u64 {
        match self {
            Self::Easy => 150,
            Self::Medium => 100,
            Self::Hard => 70,
        }
    }

    #[must_use]
    pub fn tick_interval(self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }

    /// Next preset, wrapping from hard back to easy.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

/// Single-owner repeating timer for the game loop.
///
/// Callers pass `now` explicitly, so one owner decides when ticks happen and
/// tests can drive time by hand. Re-arming replaces the previous timer.
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    interval: Option<Duration>,
    last_tick: Option<Instant>,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer; the first tick falls one `interval` after `now`.
    pub fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = Some(interval);
        self.last_tick = Some(now);
    }

    /// Disarms the timer.
    pub fn stop(&mut self) {
        self.interval = None;
        self.last_tick = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Returns true when a tick is due and consumes it.
    ///
    /// Ticks stay on the `start + k * interval` grid however late they are
    /// noticed. At most one tick is reported per call; when the caller has
    /// fallen more than a whole interval behind, the grid restarts at `now`
    /// instead of replaying missed ticks.
    pub fn due(&mut self, now: Instant) -> bool {
        let (Some(interval), Some(last_tick)) = (self.interval, self.last_tick) else {
            return false;
        };

        let scheduled = last_tick + interval;
        if now < scheduled {
            return false;
        }

        let lag = now.duration_since(scheduled);
        self.last_tick = Some(if lag >= interval { now } else { scheduled });
        true
    }

    /// Time left until the next tick, or `None` when disarmed.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        let scheduled = self.last_tick? + self.interval?;
        Some(scheduled.saturating_duration_since(now))
    }
}
