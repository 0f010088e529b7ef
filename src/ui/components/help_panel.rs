//! Help panel component

use ratatui::{
    style::Style,
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use super::super::app::App;
use super::super::layout::LayoutManager;
use super::dialogs::create_dialog_block;
use crate::constants::DIALOG_TITLE_HELP;

const HELP_TEXT: &str = "\
j/k, ↑/↓     Select task
h/l, ←/→     Focus current / completed column
Tab          Switch column
Space/Enter  Move task to the other column
c / u        Complete / reopen task
a            Add a local task
d            Delete task (with confirmation)
r            Sync now
t            Toggle light/dark theme
?            Toggle this panel
q, Ctrl+C    Quit";

/// Help panel component
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel
    pub fn render(f: &mut Frame, app: &App) {
        let area = LayoutManager::centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);

        let paragraph = Paragraph::new(HELP_TEXT)
            .block(create_dialog_block(DIALOG_TITLE_HELP, app.theme.accent))
            .style(Style::default().fg(app.theme.text).bg(app.theme.bg))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }
}
