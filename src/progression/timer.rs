use std::time::Duration;

/// Identifies one arming of a [`OneShotTimer`]. A token from an earlier
/// arming never matches a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

/// Single-shot deadline on an externally advanced clock.
///
/// Re-arming or cancelling bumps the generation, so an expiry can only be
/// reported for the most recent arming and at most once.
#[derive(Debug, Clone, Default)]
pub struct OneShotTimer {
    generation: u64,
    deadline: Option<Duration>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Duration, after: Duration) -> TimerToken {
        self.generation += 1;
        self.deadline = Some(now + after);
        TimerToken(self.generation)
    }

    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_sub(now))
    }

    /// Returns the token of the current arming once `now` reaches the
    /// deadline, then disarms.
    pub fn poll(&mut self, now: Duration) -> Option<TimerToken> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(TimerToken(self.generation))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_at_deadline() {
        let mut timer = OneShotTimer::new();
        let token = timer.start(Duration::ZERO, 100 * MS);
        assert_eq!(timer.poll(99 * MS), None);
        assert_eq!(timer.poll(100 * MS), Some(token));
        assert_eq!(timer.poll(200 * MS), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn cancelled_arming_never_fires() {
        let mut timer = OneShotTimer::new();
        timer.start(Duration::ZERO, 10 * MS);
        timer.cancel();
        assert_eq!(timer.poll(Duration::from_secs(1)), None);
    }

    #[test]
    fn rearming_invalidates_old_token() {
        let mut timer = OneShotTimer::new();
        let first = timer.start(Duration::ZERO, 10 * MS);
        let second = timer.start(5 * MS, 10 * MS);
        assert_ne!(first, second);
        assert_eq!(timer.poll(15 * MS), Some(second));
    }
}
