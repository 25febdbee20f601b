//! Load-gated spawning: the admission rule and the cadence timer.

use std::time::Duration;

use log::trace;

/// Admit a new entity only while the frame-rate estimate is strictly above
/// `min_frame_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPolicy {
    pub min_frame_rate: u32,
}

impl SpawnPolicy {
    pub fn new(min_frame_rate: u32) -> Self {
        Self { min_frame_rate }
    }

    pub fn admits(&self, frame_rate: u32) -> bool {
        frame_rate > self.min_frame_rate
    }
}

/// Periodic trigger on wall-clock time, independent of the render cadence.
///
/// A late poll fires once; intervals that passed in between are dropped
/// rather than replayed as a burst.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval: Duration,
    next_due: Duration,
    fired: u64,
    coalesced: u64,
}

impl SpawnTimer {
    /// First tick is due one interval after `now`.
    pub fn start(interval: Duration, now: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next_due: now + interval,
            fired: 0,
            coalesced: 0,
        }
    }

    /// True when a tick is due at `now`. Reschedules on the interval grid.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }

        let missed = ((now - self.next_due).as_nanos() / self.interval.as_nanos()) as u32;
        if missed > 0 {
            trace!("spawn timer coalesced {missed} missed ticks");
            self.coalesced += missed as u64;
        }
        self.next_due += self.interval * (missed + 1);
        self.fired += 1;
        true
    }

    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_policy_threshold_is_strict() {
        let policy = SpawnPolicy::new(50);
        assert!(!policy.admits(0));
        assert!(!policy.admits(49));
        assert!(!policy.admits(50));
        assert!(policy.admits(51));
        assert!(policy.admits(144));
    }

    #[test]
    fn test_timer_fires_on_interval() {
        let mut timer = SpawnTimer::start(ms(100), Duration::ZERO);
        assert!(!timer.poll(ms(99)));
        assert!(timer.poll(ms(100)));
        assert!(!timer.poll(ms(150)));
        assert!(timer.poll(ms(201)));
        assert_eq!(timer.next_due(), ms(300));
        assert_eq!(timer.fired(), 2);
    }

    #[test]
    fn test_timer_fires_once_per_poll() {
        let mut timer = SpawnTimer::start(ms(100), Duration::ZERO);
        assert!(timer.poll(ms(100)));
        assert!(!timer.poll(ms(100)));
    }

    #[test]
    fn test_late_poll_coalesces_missed_ticks() {
        let mut timer = SpawnTimer::start(ms(100), Duration::ZERO);
        // Host stalled for 450 ms: ticks at 100..400 were due.
        assert!(timer.poll(ms(450)));
        assert!(!timer.poll(ms(460)));
        assert_eq!(timer.coalesced(), 3);
        assert_eq!(timer.next_due(), ms(500));
        assert_eq!(timer.fired(), 1);
    }
}
