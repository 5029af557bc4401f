//! Sliding-window rate limiter keyed by client identity.
//!
//! Each client has an ordered list of request timestamps. On every check,
//! timestamps older than the window are dropped; if the remaining count has
//! reached the limit the request is rejected without being recorded,
//! otherwise the current instant is appended.
//!
//! # Concurrency
//!
//! The whole read-filter-append sequence runs under a single write lock on
//! the client table, so concurrent requests from the same client can never
//! push its count past the limit. Contention is low: the critical section
//! is a `retain` over at most `max_requests` entries.
//!
//! # LRU Eviction
//!
//! When the number of tracked clients exceeds `max_tracked_clients`, the
//! client with the oldest last access is evicted. This bounds memory to
//! roughly `max_tracked_clients * max_requests` timestamps.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::traits::RateLimitable;

// ── ClientWindow ─────────────────────────────────────────────────────────

/// Per-client sliding window state.
struct ClientWindow {
    /// Timestamps of admitted requests within the window, oldest first.
    timestamps: Vec<Instant>,
    /// Monotonic counter value at last access (for LRU eviction).
    last_access: u64,
}

// ── RateLimiter ──────────────────────────────────────────────────────────

/// A sliding-window rate limiter keyed by client id.
pub struct RateLimiter {
    windows: RwLock<HashMap<String, ClientWindow>>,
    window: Duration,
    max_requests: u32,
    max_tracked_clients: usize,
    /// Monotonic counter for LRU access ordering.
    access_counter: AtomicU64,
}

impl RateLimiter {
    /// Create a limiter admitting at most `max_requests` per `window` for
    /// each client.
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            window,
            max_requests,
            max_tracked_clients: 10_000,
            access_counter: AtomicU64::new(0),
        }
    }

    /// Builder method to set the maximum number of tracked clients.
    /// Default: 10,000. Values below one are raised to one.
    pub fn with_max_tracked_clients(mut self, max: usize) -> Self {
        self.max_tracked_clients = max.max(1);
        self
    }

    /// Check and record a request from `client_id` at the current instant.
    pub fn allow(&self, client_id: &str) -> bool {
        self.allow_at(client_id, Instant::now())
    }

    /// Check and record a request from `client_id` at `now`.
    ///
    /// Callers must pass non-decreasing instants per client; tests use this
    /// to drive the window with a fixed clock.
    pub fn allow_at(&self, client_id: &str, now: Instant) -> bool {
        let order = self.access_counter.fetch_add(1, Ordering::Relaxed);

        let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);
        let entry = windows
            .entry(client_id.to_string())
            .or_insert_with(|| ClientWindow {
                timestamps: Vec::new(),
                last_access: order,
            });
        entry.last_access = order;

        let window = self.window;
        entry
            .timestamps
            .retain(|ts| now.saturating_duration_since(*ts) < window);

        if entry.timestamps.len() >= self.max_requests as usize {
            tracing::debug!(
                client = client_id,
                count = entry.timestamps.len(),
                limit = self.max_requests,
                "rate limit exceeded"
            );
            return false;
        }

        entry.timestamps.push(now);

        if windows.len() > self.max_tracked_clients {
            Self::evict_oldest(&mut windows);
        }

        true
    }

    /// Requests recorded for `client_id` within the window ending now.
    pub fn count(&self, client_id: &str) -> u32 {
        self.count_at(client_id, Instant::now())
    }

    /// Requests recorded for `client_id` within the window ending at `now`.
    ///
    /// Expired timestamps are filtered but not pruned, so only a read lock
    /// is needed.
    pub fn count_at(&self, client_id: &str, now: Instant) -> u32 {
        let windows = self.windows.read().unwrap_or_else(PoisonError::into_inner);
        windows.get(client_id).map_or(0, |entry| {
            entry
                .timestamps
                .iter()
                .filter(|ts| now.saturating_duration_since(**ts) < self.window)
                .count() as u32
        })
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Remove all tracked clients.
    pub fn clear(&self) {
        self.windows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.access_counter.store(0, Ordering::Relaxed);
    }

    fn evict_oldest(windows: &mut HashMap<String, ClientWindow>) {
        let oldest = windows
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            windows.remove(&key);
        }
    }
}

impl RateLimitable for RateLimiter {
    fn allow(&self, client_id: &str) -> bool {
        RateLimiter::allow(self, client_id)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("window", &self.window)
            .field("max_requests", &self.max_requests)
            .field("max_tracked_clients", &self.max_tracked_clients)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);

    #[test]
    fn hundred_and_first_request_is_rejected() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 100);
        let t0 = Instant::now();
        for i in 0..100 {
            assert!(
                limiter.allow_at("10.0.0.1", t0 + Duration::from_millis(i)),
                "request {i} should be allowed"
            );
        }
        assert!(!limiter.allow_at("10.0.0.1", t0 + Duration::from_secs(60)));
    }

    #[test]
    fn allowed_again_after_window_elapses() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 100);
        let t0 = Instant::now();
        for _ in 0..100 {
            assert!(limiter.allow_at("10.0.0.1", t0));
        }
        assert!(!limiter.allow_at("10.0.0.1", t0 + FIFTEEN_MINUTES - Duration::from_secs(1)));
        assert!(limiter.allow_at("10.0.0.1", t0 + FIFTEEN_MINUTES));
        assert_eq!(limiter.count_at("10.0.0.1", t0 + FIFTEEN_MINUTES), 1);
    }

    #[test]
    fn window_slides_per_timestamp() {
        let limiter = RateLimiter::new(Duration::from_secs(10), 2);
        let t0 = Instant::now();
        assert!(limiter.allow_at("c", t0));
        assert!(limiter.allow_at("c", t0 + Duration::from_secs(5)));
        assert!(!limiter.allow_at("c", t0 + Duration::from_secs(9)));
        // First timestamp expires; the second is still inside the window.
        assert!(limiter.allow_at("c", t0 + Duration::from_secs(10)));
        assert!(!limiter.allow_at("c", t0 + Duration::from_secs(14)));
    }

    #[test]
    fn rejected_request_is_not_recorded() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 2);
        let t0 = Instant::now();
        assert!(limiter.allow_at("c", t0));
        assert!(limiter.allow_at("c", t0));
        assert!(!limiter.allow_at("c", t0));
        assert!(!limiter.allow_at("c", t0));
        assert_eq!(limiter.count_at("c", t0), 2);
    }

    #[test]
    fn clients_are_independent() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 3);
        for _ in 0..3 {
            assert!(limiter.allow("a"));
        }
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
        assert_eq!(limiter.count("b"), 1);
    }

    #[test]
    fn empty_client_id_is_a_distinct_key() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 1);
        assert!(limiter.allow(""));
        assert!(!limiter.allow(""));
        assert!(limiter.allow("x"));
    }

    #[test]
    fn lru_evicts_oldest_client() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 10).with_max_tracked_clients(2);
        limiter.allow("a");
        limiter.allow("b");
        limiter.allow("c");

        assert_eq!(limiter.tracked_clients(), 2);
        assert_eq!(limiter.count("a"), 0);
        assert_eq!(limiter.count("b"), 1);
        assert_eq!(limiter.count("c"), 1);
    }

    #[test]
    fn zero_tracked_clients_still_enforces_limit() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 1).with_max_tracked_clients(0);
        let admitted = (0..5).filter(|_| limiter.allow("10.0.0.1")).count();
        assert_eq!(admitted, 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn clear_resets_state() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 1);
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        limiter.clear();
        assert_eq!(limiter.tracked_clients(), 0);
        assert!(limiter.allow("a"));
    }

    #[test]
    fn concurrent_same_client_never_exceeds_limit() {
        let limiter = Arc::new(RateLimiter::new(FIFTEEN_MINUTES, 100));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || (0..50).filter(|_| limiter.allow("shared")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 100);
        assert_eq!(limiter.count("shared"), 100);
    }

    #[test]
    fn concurrent_distinct_clients_are_all_tracked() {
        let limiter = Arc::new(RateLimiter::new(FIFTEEN_MINUTES, 1000));
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    let client = format!("client_{i}");
                    for _ in 0..100 {
                        assert!(limiter.allow(&client));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(limiter.tracked_clients(), 10);
    }

    #[test]
    fn trait_delegates_to_limiter() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 1);
        let dynamic: &dyn RateLimitable = &limiter;
        assert!(dynamic.allow("a"));
        assert!(!dynamic.allow("a"));
    }

    #[test]
    fn debug_shows_limits() {
        let limiter = RateLimiter::new(FIFTEEN_MINUTES, 100);
        let debug = format!("{limiter:?}");
        assert!(debug.contains("max_requests: 100"));
    }
}
