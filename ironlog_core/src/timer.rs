//! Sampled-timestamp timers for the live session.
//!
//! Both timers compute elapsed time from timestamps handed in by the caller
//! rather than ticking on their own. The session samples its clock once per
//! operation and passes the instant down, which keeps every duration
//! deterministic under test.

use chrono::{DateTime, Utc};

/// Stopwatch with independent pause/resume and idempotent stop.
///
/// Used for the workout-level clock and the per-set clock.
#[derive(Clone, Debug, Default)]
pub struct IntervalTimer {
    started_at: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    accumulated_seconds: i64,
}

impl IntervalTimer {
    /// Start the timer. Starting a running timer is a no-op.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.paused_at = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.paused_at.is_none()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Total elapsed seconds, excluding any paused windows
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        let live = match (self.started_at, self.paused_at) {
            (Some(start), Some(paused)) => (paused - start).num_seconds(),
            (Some(start), None) => (now - start).num_seconds(),
            (None, _) => 0,
        };
        self.accumulated_seconds + live.max(0)
    }

    /// Freeze accrual without losing state. Pausing a stopped or already
    /// paused timer is a no-op.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.is_running() {
            self.paused_at = Some(now);
        }
    }

    /// Shift the baseline forward by the paused window so it never counts
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if let (Some(start), Some(paused)) = (self.started_at, self.paused_at) {
            self.started_at = Some(start + (now - paused));
            self.paused_at = None;
        }
    }

    /// Stop and return total elapsed seconds. Stopping an already-stopped
    /// timer returns the same total and changes nothing.
    pub fn stop(&mut self, now: DateTime<Utc>) -> i64 {
        let total = self.elapsed_seconds(now);
        self.accumulated_seconds = total;
        self.started_at = None;
        self.paused_at = None;
        total
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Countdown timer for the rest interval between sets.
#[derive(Clone, Debug, Default)]
pub struct RestTimer {
    timer: IntervalTimer,
    duration_seconds: i64,
}

impl RestTimer {
    /// Begin counting down from `duration_seconds`
    pub fn start(&mut self, now: DateTime<Utc>, duration_seconds: u32) {
        self.timer.reset();
        self.duration_seconds = i64::from(duration_seconds);
        self.timer.start(now);
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running() || self.timer.is_paused()
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.duration_seconds - self.timer.elapsed_seconds(now)).max(0)
    }

    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.timer.elapsed_seconds(now) >= self.duration_seconds
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.timer.pause(now);
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.timer.resume(now);
    }

    /// End the rest early, splitting the interval into the part actually
    /// rested and the part skipped. Returns `(rested, skipped)` seconds;
    /// the two always sum to the configured duration.
    pub fn skip(&mut self, now: DateTime<Utc>) -> (u32, u32) {
        let rested = self.timer.elapsed_seconds(now).min(self.duration_seconds);
        let skipped = self.duration_seconds - rested;
        self.reset();
        (rested as u32, skipped as u32)
    }

    /// Natural expiry: the full configured duration counts as rest
    pub fn complete(&mut self) -> u32 {
        let duration = self.duration_seconds;
        self.reset();
        duration as u32
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.duration_seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use chrono::Utc;

    #[test]
    fn test_elapsed_tracks_clock() {
        let clock = ManualClock::new(Utc::now());
        let mut timer = IntervalTimer::default();

        timer.start(clock.now());
        clock.advance_seconds(42);

        assert_eq!(timer.elapsed_seconds(clock.now()), 42);
    }

    #[test]
    fn test_pause_excludes_paused_window() {
        let clock = ManualClock::new(Utc::now());
        let mut timer = IntervalTimer::default();

        timer.start(clock.now());
        clock.advance_seconds(10);

        timer.pause(clock.now());
        let before = timer.elapsed_seconds(clock.now());

        clock.advance_seconds(300);
        assert_eq!(timer.elapsed_seconds(clock.now()), before);

        timer.resume(clock.now());
        assert_eq!(timer.elapsed_seconds(clock.now()), before);

        clock.advance_seconds(5);
        assert_eq!(timer.elapsed_seconds(clock.now()), 15);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let clock = ManualClock::new(Utc::now());
        let mut timer = IntervalTimer::default();

        timer.start(clock.now());
        clock.advance_seconds(30);

        let first = timer.stop(clock.now());
        clock.advance_seconds(100);
        let second = timer.stop(clock.now());

        assert_eq!(first, 30);
        assert_eq!(second, 30);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let clock = ManualClock::new(Utc::now());
        let mut timer = IntervalTimer::default();

        timer.start(clock.now());
        clock.advance_seconds(20);
        timer.start(clock.now());
        clock.advance_seconds(10);

        assert_eq!(timer.elapsed_seconds(clock.now()), 30);
    }

    #[test]
    fn test_stop_and_restart_accumulates() {
        let clock = ManualClock::new(Utc::now());
        let mut timer = IntervalTimer::default();

        timer.start(clock.now());
        clock.advance_seconds(10);
        timer.stop(clock.now());

        timer.start(clock.now());
        clock.advance_seconds(5);

        assert_eq!(timer.elapsed_seconds(clock.now()), 15);
    }

    #[test]
    fn test_rest_countdown() {
        let clock = ManualClock::new(Utc::now());
        let mut rest = RestTimer::default();

        rest.start(clock.now(), 90);
        assert_eq!(rest.remaining_seconds(clock.now()), 90);

        clock.advance_seconds(30);
        assert_eq!(rest.remaining_seconds(clock.now()), 60);
        assert!(!rest.is_finished(clock.now()));

        clock.advance_seconds(60);
        assert_eq!(rest.remaining_seconds(clock.now()), 0);
        assert!(rest.is_finished(clock.now()));
    }

    #[test]
    fn test_skip_conserves_duration() {
        let clock = ManualClock::new(Utc::now());
        let mut rest = RestTimer::default();

        rest.start(clock.now(), 90);
        clock.advance_seconds(30);

        let (rested, skipped) = rest.skip(clock.now());
        assert_eq!(rested, 30);
        assert_eq!(skipped, 60);
        assert_eq!(rested + skipped, 90);
        assert!(!rest.is_active());
    }

    #[test]
    fn test_skip_after_expiry_caps_at_duration() {
        let clock = ManualClock::new(Utc::now());
        let mut rest = RestTimer::default();

        rest.start(clock.now(), 60);
        clock.advance_seconds(75);

        let (rested, skipped) = rest.skip(clock.now());
        assert_eq!(rested, 60);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_rest_pause_extends_countdown() {
        let clock = ManualClock::new(Utc::now());
        let mut rest = RestTimer::default();

        rest.start(clock.now(), 90);
        clock.advance_seconds(20);

        rest.pause(clock.now());
        clock.advance_seconds(500);
        assert_eq!(rest.remaining_seconds(clock.now()), 70);

        rest.resume(clock.now());
        clock.advance_seconds(70);
        assert!(rest.is_finished(clock.now()));
    }
}
