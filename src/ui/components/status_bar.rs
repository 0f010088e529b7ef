//! Status bar component

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Paragraph},
    Frame,
};

use super::super::app::App;

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn render(f: &mut Frame, area: Rect, app: &App) {
        let theme = app.theme;
        let (status_text, status_color) = if app.is_syncing() {
            ("🔄 Syncing with Google Tasks...".to_string(), theme.accent)
        } else if !app.pending_moves.is_empty() {
            ("🔄 Updating Google Tasks...".to_string(), theme.accent)
        } else if let Some(error) = &app.last_sync_error {
            (format!("⚠ Last sync failed: {error}"), theme.error)
        } else {
            let synced = app
                .last_sync
                .map(|t| format!("Synced {} • ", t.format("%H:%M")))
                .unwrap_or_default();
            (
                format!("{synced}Space: move • a: add • d: delete • r: sync • t: theme • ?: help • q: quit"),
                theme.muted,
            )
        };

        let status_bar = Paragraph::new(status_text)
            .block(Block::default())
            .alignment(Alignment::Center)
            .style(Style::default().fg(status_color).bg(theme.bg));

        f.render_widget(status_bar, area);
    }
}
