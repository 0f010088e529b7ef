//! Constants used throughout the application
//!
//! This module centralizes magic strings, UI text, and other constant values
//! to improve maintainability and consistency.

/// Number of completed tasks kept on the board, most recent first
pub const COMPLETED_DISPLAY_LIMIT: usize = 2;

/// Title shown for remote tasks that have none
pub const UNTITLED_TASK: &str = "(untitled)";

// Section Headers
pub const HEADER_ACTIVE: &str = "📋 Current tasks";
pub const HEADER_COMPLETED: &str = "✅ Completed";

// Success Messages
pub const SUCCESS_TASK_COMPLETED: &str = "✅ Task completed";
pub const SUCCESS_TASK_REOPENED: &str = "↩️ Task reopened";
pub const SUCCESS_TASK_ADDED: &str = "✅ Task added";
pub const SUCCESS_TASK_DELETED: &str = "✅ Task deleted";

// Error Messages
pub const ERROR_MOVE_FAILED: &str = "❌ Could not update Google Tasks. Check your authorization settings.";
pub const ERROR_TASK_TITLE_EMPTY: &str = "❌ Task title cannot be empty";
pub const ERROR_TASK_DELETE_FAILED: &str = "❌ Failed to delete task";
pub const ERROR_TASK_DELETE_SHADOWED: &str = "❌ An earlier card has the same title, delete that one first";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const AUTH_PROMPT: &str = "🔑 Authorization required. Open this URL in a browser:";
pub const DIALOG_TITLE_ERROR: &str = " Error ";
pub const DIALOG_TITLE_INFO: &str = " Info ";
pub const DIALOG_TITLE_NEW_TASK: &str = " New task ";
pub const DIALOG_TITLE_DELETE: &str = " Delete task ";
pub const DIALOG_TITLE_HELP: &str = " Keys ";

// Sync defaults
/// Grace period before the first background sync, in seconds
pub const DEFAULT_INITIAL_SYNC_DELAY_SECS: u64 = 2;
/// Interval between background syncs, in seconds
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;
/// Upper bound for a single remote request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// How long the consent flow waits for the browser redirect, in seconds
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;
/// Longest accepted sync interval (24 hours), in seconds
pub const MAX_SYNC_INTERVAL_SECS: u64 = 86_400;

// UI Layout Constants
/// Share of the width given to the completed column, in percent
pub const COMPLETED_COLUMN_PERCENT: u16 = 30;
/// How long the completion popup stays up, in milliseconds
pub const DEFAULT_POPUP_DURATION_MS: u64 = 4_000;
