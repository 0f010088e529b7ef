//! Taskboard - a two-column task board synced with Google Tasks
//!
//! The board keeps current tasks on the left and the most recently
//! completed ones on the right. Moving a card between the columns completes
//! or reopens the matching Google task, and the board refreshes itself in
//! the background.
//!
//! # Modules
//!
//! * [`backend`] - Remote task client trait and the Google Tasks client
//! * [`config`] - Application configuration management
//! * [`entities`] - Task and section models
//! * [`sync`] - Reconciliation between the board and the remote list
//! * [`ui`] - Terminal user interface components
//! * [`utils`] - Date formatting helpers

/// Remote task clients
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Board data models
pub mod entities;

/// File logging setup
pub mod logger;

/// Reconciliation engine and background sync plumbing
pub mod sync;

/// Terminal user interface components and rendering
pub mod ui;

/// Utility functions for date/time handling
pub mod utils;

pub use entities::{Section, Sections, Task, TaskRef};
pub use sync::Reconciler;
