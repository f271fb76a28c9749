//! Restart policy for supervised background tasks
//!
//! A task that fails is restarted unless it has already been restarted
//! `max_restarts` times within the last `window_ms`. The policy only keeps
//! the most recent restart timestamps; it knows nothing about tasks or
//! executors, which keeps it testable with plain numbers.

use heapless::Deque;

/// Upper bound on `max_restarts`
pub const MAX_TRACKED_RESTARTS: usize = 8;

/// Default restarts allowed inside one window
pub const DEFAULT_MAX_RESTARTS: u8 = 3;

/// Default window length
pub const DEFAULT_WINDOW_MS: u64 = 30_000;

/// Decision after a task failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Start the task again
    Restart,
    /// Too many recent restarts; give up
    Fatal,
}

/// Sliding-window restart limiter
#[derive(Debug, Clone)]
pub struct RestartPolicy {
    max_restarts: u8,
    window_ms: u64,
    /// Monotonic timestamps of recent restarts, oldest first
    restarts: Deque<u64, MAX_TRACKED_RESTARTS>,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESTARTS, DEFAULT_WINDOW_MS)
    }
}

impl RestartPolicy {
    /// Create a policy; `max_restarts` is capped at [`MAX_TRACKED_RESTARTS`]
    pub fn new(max_restarts: u8, window_ms: u64) -> Self {
        Self {
            max_restarts: max_restarts.min(MAX_TRACKED_RESTARTS as u8),
            window_ms,
            restarts: Deque::new(),
        }
    }

    pub fn max_restarts(&self) -> u8 {
        self.max_restarts
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Restarts currently remembered
    pub fn recent_restarts(&self) -> usize {
        self.restarts.len()
    }

    /// Record a failure at `now_ms` and decide what to do
    pub fn on_failure(&mut self, now_ms: u64) -> Verdict {
        let limit = self.max_restarts as usize;
        if self.restarts.len() >= limit {
            let within_window = match self.restarts.front() {
                Some(oldest) => now_ms.saturating_sub(*oldest) <= self.window_ms,
                // A zero limit never restarts
                None => true,
            };
            if within_window {
                return Verdict::Fatal;
            }
        }

        if limit == 0 {
            return Verdict::Fatal;
        }
        while self.restarts.len() >= limit {
            self.restarts.pop_front();
        }
        // Length is below the limit, which is at most the capacity
        let _ = self.restarts.push_back(now_ms);
        Verdict::Restart
    }

    /// Forget all recorded restarts
    pub fn reset(&mut self) {
        self.restarts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(policy: &mut RestartPolicy, failures_s: &[u64]) -> Verdict {
        let mut verdict = Verdict::Restart;
        for t in failures_s {
            verdict = policy.on_failure(t * 1000);
        }
        verdict
    }

    #[test]
    fn test_fourth_failure_in_window_is_fatal() {
        let mut policy = RestartPolicy::default();
        assert_eq!(policy.on_failure(0), Verdict::Restart);
        assert_eq!(policy.on_failure(10_000), Verdict::Restart);
        assert_eq!(policy.on_failure(20_000), Verdict::Restart);
        assert_eq!(policy.on_failure(25_000), Verdict::Fatal);
    }

    #[test]
    fn test_old_restarts_age_out() {
        let mut policy = RestartPolicy::default();
        assert_eq!(run(&mut policy, &[0, 10, 40, 41]), Verdict::Restart);
        assert_eq!(policy.recent_restarts(), 3);
    }

    #[test]
    fn test_boundary_is_inside_window() {
        let mut policy = RestartPolicy::default();
        assert_eq!(run(&mut policy, &[0, 10, 20, 30]), Verdict::Fatal);
        let mut policy = RestartPolicy::default();
        assert_eq!(run(&mut policy, &[0, 10, 20]), Verdict::Restart);
        assert_eq!(policy.on_failure(30_001), Verdict::Restart);
    }

    #[test]
    fn test_zero_restarts_is_always_fatal() {
        let mut policy = RestartPolicy::new(0, 1000);
        assert_eq!(policy.on_failure(0), Verdict::Fatal);
    }

    #[test]
    fn test_limit_is_capped() {
        let policy = RestartPolicy::new(50, 1000);
        assert_eq!(policy.max_restarts() as usize, MAX_TRACKED_RESTARTS);
    }

    proptest! {
        #[test]
        fn prop_spread_out_failures_always_restart(
            gaps in proptest::collection::vec(30_001u64..100_000, 1..30)
        ) {
            // One failure per window can never exhaust the budget
            let mut policy = RestartPolicy::default();
            let mut now = 0;
            for gap in gaps {
                now += gap;
                prop_assert_eq!(policy.on_failure(now), Verdict::Restart);
                prop_assert!(policy.recent_restarts() <= 3);
            }
        }
    }
}
