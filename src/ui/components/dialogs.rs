//! Modal dialogs drawn over the board

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::super::app::{App, InputField};
use super::super::layout::LayoutManager;
use super::super::theme::Theme;
use crate::constants::{DIALOG_TITLE_DELETE, DIALOG_TITLE_ERROR, DIALOG_TITLE_INFO, DIALOG_TITLE_NEW_TASK};

/// Creates a styled main dialog block
pub fn create_dialog_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(color))
}

/// Creates an input field with a visual cursor when focused
fn create_input_paragraph<'a>(value: &'a str, field_title: &str, focused: bool, theme: &Theme) -> Paragraph<'a> {
    let display = if focused { format!("{value}█") } else { value.to_string() };
    let border = if focused { theme.focus_border } else { theme.muted };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {field_title} "))
        .border_style(Style::default().fg(border));

    Paragraph::new(display)
        .block(block)
        .style(Style::default().fg(theme.text).bg(theme.bg))
}

/// Key hints rendered under a dialog: (key, description)
fn create_instructions(instructions: &[(&'static str, &'static str)], theme: &Theme) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (i, (key, desc)) in instructions.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(theme.muted)));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(*desc, Style::default().fg(theme.muted)));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn render_message(f: &mut Frame, title: &str, message: &str, color: Color, theme: &Theme) {
    let area = LayoutManager::centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(format!("{message}\n\nPress Enter or Esc to close"))
        .block(create_dialog_block(title, color))
        .style(Style::default().fg(theme.text).bg(theme.bg))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Error dialog component
pub struct ErrorDialog;

impl ErrorDialog {
    pub fn render(f: &mut Frame, app: &App) {
        if let Some(message) = &app.error_message {
            render_message(f, DIALOG_TITLE_ERROR, message, app.theme.error, &app.theme);
        }
    }
}

/// Info dialog component
pub struct InfoDialog;

impl InfoDialog {
    pub fn render(f: &mut Frame, app: &App) {
        if let Some(message) = &app.info_message {
            render_message(f, DIALOG_TITLE_INFO, message, app.theme.accent, &app.theme);
        }
    }
}

/// Dialog for adding a local task
pub struct TaskCreationDialog;

impl TaskCreationDialog {
    pub fn render(f: &mut Frame, app: &App) {
        let theme = &app.theme;
        let area = LayoutManager::centered_rect(60, 40, f.area());
        f.render_widget(Clear, area);

        let block = create_dialog_block(DIALOG_TITLE_NEW_TASK, theme.accent).style(Style::default().bg(theme.bg));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)])
            .split(inner);

        f.render_widget(
            create_input_paragraph(&app.new_task_title, "Title", app.input_field == InputField::Title, theme),
            chunks[0],
        );
        f.render_widget(
            create_input_paragraph(
                &app.new_task_description,
                "Description",
                app.input_field == InputField::Description,
                theme,
            ),
            chunks[1],
        );
        f.render_widget(
            create_instructions(&[("Enter", " Add"), ("Tab", " Switch field"), ("Esc", " Cancel")], theme),
            chunks[2],
        );
    }
}

/// Delete confirmation dialog
pub struct DeleteConfirmationDialog;

impl DeleteConfirmationDialog {
    pub fn render(f: &mut Frame, app: &App) {
        let Some(title) = &app.delete_confirmation else {
            return;
        };
        let theme = &app.theme;
        let area = LayoutManager::centered_rect(50, 25, f.area());
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(format!("Delete \"{title}\" from the board?")),
            Line::from(Span::styled(
                "Google Tasks is not changed.",
                Style::default().fg(theme.muted),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
                Span::raw(" Delete • "),
                Span::styled("n", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
                Span::raw(" Keep"),
            ]),
        ];

        let paragraph = Paragraph::new(text)
            .block(create_dialog_block(DIALOG_TITLE_DELETE, theme.error))
            .style(Style::default().fg(theme.text).bg(theme.bg))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }
}

/// Short-lived notice in the bottom right corner
pub struct PopupToast;

impl PopupToast {
    pub fn render(f: &mut Frame, app: &App) {
        let Some(popup) = &app.popup else {
            return;
        };
        let screen = f.area();
        let width = (popup.message.chars().count() as u16).saturating_add(4).min(screen.width);
        let height = 3u16.min(screen.height);
        // Sits above the status bar
        let y = screen.height.saturating_sub(height + 1);
        let area = Rect::new(screen.width.saturating_sub(width), y, width, height);

        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(popup.message.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(app.theme.accent)),
            )
            .style(Style::default().fg(app.theme.card_text).bg(app.theme.card_bg))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }
}
