//! Layout management and calculations

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::constants::COMPLETED_COLUMN_PERCENT;

/// Manages layout calculations and constraints for the UI
pub struct LayoutManager;

impl LayoutManager {
    /// Split the screen into the board and a one-line status bar below it
    #[must_use]
    pub fn main_layout(area: Rect) -> (Rect, Rect) {
        let board_height = area.height.saturating_sub(1);
        let board = Rect::new(area.x, area.y, area.width, board_height);
        let status = Rect::new(area.x, area.y + board_height, area.width, area.height.min(1));
        (board, status)
    }

    /// Split the board into the active column and the narrower completed column
    #[must_use]
    pub fn board_layout(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - COMPLETED_COLUMN_PERCENT),
                Constraint::Percentage(COMPLETED_COLUMN_PERCENT),
            ])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// Rectangle of `percent_x` by `percent_y` centered in `r`
    #[must_use]
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}
