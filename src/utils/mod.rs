//! Utility modules shared by the engine and the UI.
//!
//! - [`datetime`] - Remote timestamp parsing and human-readable formatting

pub mod datetime;
