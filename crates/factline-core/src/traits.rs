//! Seams between the HTTP layer and the pipeline logic.

/// Admission check keyed by client identity.
///
/// The Gateway holds an `Arc<dyn RateLimitable>` so the limiter can be
/// swapped (e.g. for a shared store) without touching the handlers.
pub trait RateLimitable: Send + Sync {
    /// Returns `true` if a request from `client_id` may proceed. An
    /// admitted request is recorded; a rejected one is not.
    fn allow(&self, client_id: &str) -> bool;
}
