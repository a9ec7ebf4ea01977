use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Per-user budget of outbound image provider calls, as a sliding window.
///
/// Keyed by user id. When a user is over budget the caller is expected to
/// skip the provider and serve the fallback image instead of failing.
pub struct RateLimiter {
    /// Call timestamps per user, oldest first.
    calls: HashMap<String, VecDeque<Instant>>,
    /// The maximum number of calls allowed within the `window`.
    limit: usize,
    /// The duration of the sliding window.
    window: Duration,
}

impl RateLimiter {
    /// Creates a new `RateLimiter`.
    ///
    /// # Arguments
    ///
    /// * `limit` - The number of calls allowed per `window`.
    /// * `window` - The time duration of the sliding window.
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            calls: HashMap::new(),
            limit,
            window,
        }
    }

    /// Records a call for `user_id` if it fits in the budget.
    ///
    /// Returns `true` when the call is allowed.
    pub fn try_acquire(&mut self, user_id: &str) -> bool {
        self.try_acquire_at(user_id, Instant::now())
    }

    fn try_acquire_at(&mut self, user_id: &str, now: Instant) -> bool {
        let window = self.window;
        let user_calls = self.calls.entry(user_id.to_string()).or_default();
        evict_expired(user_calls, now, window);

        if user_calls.len() < self.limit {
            user_calls.push_back(now);
            true
        } else {
            false
        }
    }

    /// Calls left for `user_id` in the current window.
    pub fn remaining(&self, user_id: &str) -> usize {
        let now = Instant::now();
        let used = self
            .calls
            .get(user_id)
            .map(|c| c.iter().filter(|t| now.duration_since(**t) < self.window).count())
            .unwrap_or(0);
        self.limit.saturating_sub(used)
    }

    /// Drops users whose calls have all expired.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.calls.retain(|_, c| {
            evict_expired(c, now, window);
            !c.is_empty()
        });
    }

    pub fn tracked_users(&self) -> usize {
        self.calls.len()
    }
}

fn evict_expired(calls: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = calls.front() {
        if now.duration_since(*oldest) >= window {
            calls.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_allows_calls_within_limit() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(60));
        for _ in 0..5 {
            assert!(limiter.try_acquire("user1"));
        }
        assert!(!limiter.try_acquire("user1"));
        assert_eq!(limiter.remaining("user1"), 0);
    }

    #[test]
    fn test_users_have_separate_budgets() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.try_acquire("alice"));
        assert!(!limiter.try_acquire("alice"));
        assert!(limiter.try_acquire("bob"));
        assert_eq!(limiter.remaining("carol"), 1);
    }

    #[test]
    fn test_window_slides() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();

        assert!(limiter.try_acquire_at("u", start));
        assert!(limiter.try_acquire_at("u", start + Duration::from_secs(5)));
        assert!(!limiter.try_acquire_at("u", start + Duration::from_secs(9)));
        // first call has left the window
        assert!(limiter.try_acquire_at("u", start + Duration::from_secs(10)));
        assert!(!limiter.try_acquire_at("u", start + Duration::from_secs(11)));
    }

    #[test]
    fn test_zero_limit_never_allows() {
        let mut limiter = RateLimiter::new(0, Duration::from_secs(60));
        assert!(!limiter.try_acquire("user"));
    }

    #[test]
    fn test_prune_drops_idle_users() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(50));
        assert!(limiter.try_acquire("idle"));
        assert_eq!(limiter.tracked_users(), 1);

        thread::sleep(Duration::from_millis(60));

        limiter.prune();
        assert_eq!(limiter.tracked_users(), 0);
        assert!(limiter.try_acquire("idle"));
    }
}
