//! Shared helpers for HTML extraction.

mod pattern;
mod selector;

pub use pattern::{capture_i64, parse_regex_unsafe};
pub use selector::parse_selector_unsafe;
