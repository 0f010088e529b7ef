//! Event handling and key bindings

use super::app::{App, InputField};
use crate::entities::Section;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Handle a terminal event. Returns whether it was consumed.
pub fn handle_events(event: Event, app: &mut App) -> bool {
    if let Event::Key(key) = event {
        if key.kind == KeyEventKind::Press {
            return handle_key(key, app);
        }
    }
    false
}

/// Route a key press to whichever dialog is on top, or to the board
pub fn handle_key(key: KeyEvent, app: &mut App) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return true;
    }

    // Handle error/info message dialogs
    if app.error_message.is_some() || app.info_message.is_some() {
        return handle_message_dialog(key, app);
    }

    // Handle task creation dialog
    if app.creating_task {
        return handle_task_creation_mode(key, app);
    }

    // Handle delete confirmation dialog
    if app.delete_confirmation.is_some() {
        return handle_delete_confirmation(key, app);
    }

    // Handle help panel - block all other shortcuts when help is open
    if app.show_help {
        return handle_help_panel(key, app);
    }

    handle_normal_mode(key, app)
}

fn handle_message_dialog(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ' | 'q') => {
            app.dismiss_messages();
            true
        }
        _ => false,
    }
}

fn handle_delete_confirmation(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('y' | 'Y') => {
            app.confirm_delete();
            true
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => {
            app.delete_confirmation = None;
            true
        }
        _ => false, // Ignore other keys during confirmation
    }
}

fn handle_help_panel(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?' | 'q') => {
            app.show_help = false;
            true
        }
        _ => false,
    }
}

fn handle_task_creation_mode(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_task_creation(),
        KeyCode::Enter => app.submit_new_task(),
        KeyCode::Tab | KeyCode::BackTab => {
            app.input_field = match app.input_field {
                InputField::Title => InputField::Description,
                InputField::Description => InputField::Title,
            };
        }
        KeyCode::Backspace => {
            current_input(app).pop();
        }
        KeyCode::Char(c) => current_input(app).push(c),
        _ => return false,
    }
    true
}

fn current_input(app: &mut App) -> &mut String {
    match app.input_field {
        InputField::Title => &mut app.new_task_title,
        InputField::Description => &mut app.new_task_description,
    }
}

fn handle_normal_mode(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.next_task(),
        KeyCode::Char('k') | KeyCode::Up => app.previous_task(),
        KeyCode::Char('h') | KeyCode::Left => app.focus_section(Section::Active),
        KeyCode::Char('l') | KeyCode::Right => app.focus_section(Section::Completed),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Enter | KeyCode::Char(' ') => app.move_selected(),
        KeyCode::Char('c') => app.move_selected_to(Section::Completed),
        KeyCode::Char('u') => app.move_selected_to(Section::Active),
        KeyCode::Char('a') => app.start_task_creation(),
        KeyCode::Char('d') => app.request_delete_selected(),
        KeyCode::Char('r') => {
            app.request_sync();
        }
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('?') => app.show_help = true,
        _ => return false,
    }
    true
}
