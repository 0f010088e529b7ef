//! Terminal user interface
//!
//! A single loop owns the [`App`] state; background workers report back
//! through [`actions::Action`] messages.

pub mod actions;
pub mod app;
pub mod components;
pub mod events;
pub mod layout;
pub mod renderer;
pub mod theme;

pub use actions::Action;
pub use app::App;
pub use events::handle_events;
pub use layout::LayoutManager;
pub use renderer::{render_ui, run_app};
pub use theme::{Theme, ThemeKind};
