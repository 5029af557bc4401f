//! Pipeline logic shared by the factline stages.
//!
//! Everything here is synchronous and free of network I/O:
//!
//! - [`rate_limiter`] -- per-client sliding-window request limiter
//! - [`prompt`] -- classification and summary prompt templates
//! - [`label`] -- label extraction from free-form model output
//! - [`validation`] -- text length checks and excerpts

pub mod label;
pub mod prompt;
pub mod rate_limiter;
pub mod traits;
pub mod validation;

pub use label::{extract_label, resolve_verdict};
pub use prompt::{build_classification_prompt, build_summary_prompt};
pub use rate_limiter::RateLimiter;
pub use traits::RateLimitable;
pub use validation::{excerpt, optional_flag, required_text, validate_text, ValidationError};
