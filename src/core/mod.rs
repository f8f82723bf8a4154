//! Core types shared by every module: the typed [`RenderError`] and the
//! CLI-facing [`ErrorContext`].
//!
//! Library operations return `Result<T, RenderError>` so callers can match on the
//! precise failure. The CLI layer works in `anyhow::Result` and converts at the edge
//! with [`user_friendly_error`].

pub mod error;
mod similarity;

pub use error::{ErrorContext, RenderError, user_friendly_error};
pub use similarity::find_similar;
