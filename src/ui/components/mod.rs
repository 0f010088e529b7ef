//! Render components for the board and its overlays

pub mod board;
pub mod dialogs;
pub mod help_panel;
pub mod status_bar;

pub use board::SectionColumn;
pub use dialogs::{DeleteConfirmationDialog, ErrorDialog, InfoDialog, PopupToast, TaskCreationDialog};
pub use help_panel::HelpPanel;
pub use status_bar::StatusBar;
