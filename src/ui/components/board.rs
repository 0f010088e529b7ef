//! One column of the board: the active list or the completed history

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

use super::super::app::App;
use crate::constants::{HEADER_ACTIVE, HEADER_COMPLETED};
use crate::entities::{Section, Task};
use crate::utils::datetime::format_completed_at;

/// Section column component
pub struct SectionColumn;

impl SectionColumn {
    /// Render the tasks of `section` into `area`
    pub fn render(f: &mut Frame, area: Rect, app: &App, section: Section) {
        let theme = app.theme;
        let focused = app.focus == section;
        let title = match section {
            Section::Active => format!(" {} ({}) ", HEADER_ACTIVE, app.tasks(section).len()),
            Section::Completed => format!(" {} ", HEADER_COMPLETED),
        };

        let border_style = if focused {
            Style::default().fg(theme.focus_border).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(theme.text).bg(theme.bg));

        let tasks = app.tasks(section);
        let items: Vec<ListItem> = if tasks.is_empty() {
            let hint = match section {
                Section::Active => "No tasks. Press 'a' to add one.",
                Section::Completed => "Nothing completed yet.",
            };
            vec![ListItem::new(Line::from(Span::styled(hint, Style::default().fg(theme.muted))))]
        } else {
            tasks.iter().map(|task| Self::task_item(app, task, section)).collect()
        };

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .fg(theme.card_text)
                .bg(theme.card_bg)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = ListState::default();
        if focused && !tasks.is_empty() {
            state.select(Some(app.selected_index(section)));
        }
        f.render_stateful_widget(list, area, &mut state);
    }

    fn task_item<'a>(app: &App, task: &'a Task, section: Section) -> ListItem<'a> {
        let theme = app.theme;
        let marker = match section {
            Section::Active => "○",
            Section::Completed => "✓",
        };
        let mut title_spans = vec![
            Span::styled(format!("{marker} "), Style::default().fg(theme.accent)),
            Span::styled(task.title.as_str(), Style::default().fg(theme.text)),
        ];
        if app.is_pending(task) {
            title_spans.push(Span::styled(" ⟳", Style::default().fg(theme.accent)));
        }
        if task.is_local() {
            title_spans.push(Span::styled(" (local)", Style::default().fg(theme.muted)));
        }

        let mut lines = vec![Line::from(title_spans)];
        if app.show_descriptions && !task.description.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", task.description.trim()),
                Style::default().fg(theme.muted),
            )));
        }
        if let (Section::Completed, Some(completed_at)) = (section, task.completed_at.as_ref()) {
            lines.push(Line::from(Span::styled(
                format!("  {}", format_completed_at(completed_at)),
                Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
            )));
        }
        ListItem::new(lines)
    }
}
