//! # CUtil - Common Utilities Library
//!
//! Small helpers shared by the workspace crates.
//!
//! ## Features
//!
//! - `time`: Wall-clock helpers (local time formatting, epoch milliseconds)

#[cfg(feature = "time")]
pub mod time;
