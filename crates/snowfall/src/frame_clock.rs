//! Frame pacing for the render loop.

use std::time::{Duration, Instant};

/// Keeps track of when the next frame is due.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next_frame: Instant,
}

impl FrameClock {
    /// Create a clock whose first frame is due immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_frame: Instant::now(),
        }
    }

    /// Schedule the frame after the one just drawn.
    ///
    /// A late frame pushes the schedule back instead of queueing catch-up frames.
    pub fn schedule_next(&mut self) {
        self.schedule_next_from(Instant::now());
    }

    fn schedule_next_from(&mut self, now: Instant) {
        self.next_frame += self.interval;
        if self.next_frame <= now {
            self.next_frame = now + self.interval;
        }
    }

    /// Time left before the next frame, `None` once it is due.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_from(Instant::now())
    }

    fn remaining_from(&self, now: Instant) -> Option<Duration> {
        self.next_frame
            .checked_duration_since(now)
            .filter(|remaining| !remaining.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(16);

    #[test]
    fn test_first_frame_is_due() {
        let clock = FrameClock::new(INTERVAL);
        assert_eq!(clock.remaining_from(clock.next_frame), None);
    }

    #[test]
    fn test_on_time_frames_keep_cadence() {
        let start = Instant::now();
        let mut clock = FrameClock {
            interval: INTERVAL,
            next_frame: start,
        };
        clock.schedule_next_from(start + Duration::from_millis(3));
        assert_eq!(clock.next_frame, start + INTERVAL);
        assert_eq!(
            clock.remaining_from(start + Duration::from_millis(10)),
            Some(Duration::from_millis(6))
        );
    }

    #[test]
    fn test_late_frame_does_not_build_backlog() {
        let start = Instant::now();
        let mut clock = FrameClock {
            interval: INTERVAL,
            next_frame: start,
        };
        let late = start + Duration::from_millis(100);
        clock.schedule_next_from(late);
        assert_eq!(clock.next_frame, late + INTERVAL);
        assert_eq!(clock.remaining_from(late + INTERVAL), None);
    }
}
