//! Process-wide gate on how often a search may be started.
//!
//! The gate is shared by every caller: one allowed action per delay window,
//! no matter who asks. Rejected callers get an immediate answer and a hint
//! of how long to wait; nothing is queued. The cooldown ends lazily, the
//! next call after the window simply observes it.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::Serialize;

use crate::core::time::{Clock, SystemClock};

const NEVER: u64 = u64::MAX;

/// Outcome of asking the throttle for permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThrottleDecision {
    pub allowed: bool,
    pub remaining_seconds: u64,
}

impl ThrottleDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            remaining_seconds: 0,
        }
    }

    fn denied(remaining_ms: u64) -> Self {
        Self {
            allowed: false,
            remaining_seconds: remaining_ms.div_ceil(1000),
        }
    }
}

/// Window length plus the current decision, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThrottleStatus {
    pub delay_ms: u64,
    pub decision: ThrottleDecision,
}

pub struct SearchThrottle {
    clock: Arc<dyn Clock>,
    window_ms: u64,
    last_action_ms: AtomicU64,
}

impl SearchThrottle {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, Arc::new(SystemClock))
    }

    pub fn with_clock(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            window_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            last_action_ms: AtomicU64::new(NEVER),
        }
    }

    pub fn delay_window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn delay_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn status(&self) -> ThrottleStatus {
        ThrottleStatus {
            delay_ms: self.window_ms,
            decision: self.peek(),
        }
    }

    /// Claim the gate if the window since the last allowed action has passed.
    ///
    /// The check and the timestamp update are one compare-and-swap, so two
    /// concurrent callers can never both be allowed inside a single window.
    pub fn try_acquire(&self) -> ThrottleDecision {
        let mut last = self.last_action_ms.load(Ordering::Acquire);
        loop {
            let now = self.clock.now_ms();
            if let Some(remaining) = self.remaining_ms(last, now) {
                tracing::debug!(remaining_ms = remaining, "search throttled");
                return ThrottleDecision::denied(remaining);
            }
            match self.last_action_ms.compare_exchange_weak(
                last,
                now,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    tracing::debug!(at_ms = now, "search allowed");
                    return ThrottleDecision::allowed();
                }
                Err(current) => last = current,
            }
        }
    }

    /// What `try_acquire` would answer right now, without claiming the gate.
    pub fn peek(&self) -> ThrottleDecision {
        let last = self.last_action_ms.load(Ordering::Acquire);
        match self.remaining_ms(last, self.clock.now_ms()) {
            Some(remaining) => ThrottleDecision::denied(remaining),
            None => ThrottleDecision::allowed(),
        }
    }

    /// Forget the last allowed action; the next call is allowed.
    pub fn reset(&self) {
        self.last_action_ms.store(NEVER, Ordering::Release);
        tracing::info!("search throttle reset");
    }

    // A clock that stepped backwards counts as zero elapsed.
    fn remaining_ms(&self, last: u64, now: u64) -> Option<u64> {
        if last == NEVER {
            return None;
        }
        let elapsed = now.saturating_sub(last);
        (elapsed < self.window_ms).then(|| self.window_ms - elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::ManualClock;

    fn throttle(window_ms: u64, clock: &Arc<ManualClock>) -> SearchThrottle {
        SearchThrottle::with_clock(Duration::from_millis(window_ms), clock.clone())
    }

    #[test]
    fn two_second_window_scenario() {
        let clock = Arc::new(ManualClock::new(0));
        let gate = throttle(2000, &clock);

        assert_eq!(gate.try_acquire(), ThrottleDecision::allowed());

        clock.set(500);
        let denied = gate.try_acquire();
        assert!(!denied.allowed);
        assert_eq!(denied.remaining_seconds, 2);

        clock.set(2001);
        assert_eq!(gate.try_acquire(), ThrottleDecision::allowed());
    }

    #[test]
    fn denial_does_not_extend_the_window() {
        let clock = Arc::new(ManualClock::new(1_000));
        let gate = throttle(2000, &clock);
        assert!(gate.try_acquire().allowed);

        clock.set(2_900);
        assert!(!gate.try_acquire().allowed);
        clock.set(3_000);
        assert!(gate.try_acquire().allowed);
    }

    #[test]
    fn reset_reopens_immediately() {
        let clock = Arc::new(ManualClock::new(50_000));
        let gate = throttle(60_000, &clock);
        assert!(gate.try_acquire().allowed);
        assert!(!gate.try_acquire().allowed);

        gate.reset();
        assert_eq!(gate.try_acquire(), ThrottleDecision::allowed());
    }

    #[test]
    fn peek_leaves_state_alone() {
        let clock = Arc::new(ManualClock::new(0));
        let gate = throttle(1000, &clock);
        assert!(gate.peek().allowed);
        assert!(gate.peek().allowed);
        assert!(gate.try_acquire().allowed);

        clock.set(200);
        assert_eq!(gate.peek().remaining_seconds, 1);
        clock.set(1000);
        assert!(gate.peek().allowed);
        assert_eq!(gate.status().delay_ms, 1000);
        assert!(gate.try_acquire().allowed);
    }

    #[test]
    fn status_reports_cooldown() {
        let clock = Arc::new(ManualClock::new(0));
        let gate = throttle(2500, &clock);
        assert!(gate.try_acquire().allowed);

        clock.set(400);
        let status = gate.status();
        assert_eq!(status.delay_ms, 2500);
        assert_eq!(gate.delay_window(), Duration::from_millis(2500));
        assert!(!status.decision.allowed);
        assert_eq!(status.decision.remaining_seconds, 3);
        assert!(gate.try_acquire().remaining_seconds > 0);
    }

    #[test]
    fn backwards_clock_waits_full_window() {
        let clock = Arc::new(ManualClock::new(10_000));
        let gate = throttle(3000, &clock);
        assert!(gate.try_acquire().allowed);

        clock.set(4_000);
        let denied = gate.try_acquire();
        assert!(!denied.allowed);
        assert_eq!(denied.remaining_seconds, 3);
    }

    #[test]
    fn zero_window_never_throttles() {
        let clock = Arc::new(ManualClock::new(0));
        let gate = throttle(0, &clock);
        for _ in 0..5 {
            assert!(gate.try_acquire().allowed);
        }
    }
}
