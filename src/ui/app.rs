//! Application state and business logic

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use super::actions::Action;
use super::theme::Theme;
use crate::config::UiConfig;
use crate::constants::{
    AUTH_PROMPT, ERROR_MOVE_FAILED, ERROR_TASK_DELETE_FAILED, ERROR_TASK_DELETE_SHADOWED, ERROR_TASK_TITLE_EMPTY,
    SUCCESS_TASK_ADDED, SUCCESS_TASK_COMPLETED, SUCCESS_TASK_DELETED, SUCCESS_TASK_REOPENED,
};
use crate::entities::{Section, Task, TaskRef};
use crate::sync::{MoveError, MovePlan, Reconciler};

/// Field focused in the task creation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputField {
    #[default]
    Title,
    Description,
}

/// Transient message that disappears on its own
#[derive(Debug, Clone)]
pub struct Popup {
    pub message: String,
    pub until: Instant,
}

/// Application state
pub struct App {
    pub engine: Reconciler,
    pub theme: Theme,
    pub show_descriptions: bool,
    pub popup_duration: Duration,
    pub should_quit: bool,

    pub focus: Section,
    pub selected_active: usize,
    pub selected_completed: usize,

    // Task creation
    pub creating_task: bool,
    pub input_field: InputField,
    pub new_task_title: String,
    pub new_task_description: String,

    pub delete_confirmation: Option<String>, // Title to delete if confirmed
    pub error_message: Option<String>,
    pub info_message: Option<String>,
    pub popup: Option<Popup>,
    pub show_help: bool,

    /// Moves whose remote call is still running
    pub pending_moves: Vec<TaskRef>,
    pub last_sync: Option<DateTime<Local>>,
    pub last_sync_error: Option<String>,

    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    /// Create a new App around an engine; worker results arrive on `action_tx`
    #[must_use]
    pub fn new(engine: Reconciler, ui: &UiConfig, theme: Theme, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            engine,
            theme,
            show_descriptions: ui.show_descriptions,
            popup_duration: Duration::from_millis(ui.popup_duration_ms),
            should_quit: false,
            focus: Section::Active,
            selected_active: 0,
            selected_completed: 0,
            creating_task: false,
            input_field: InputField::Title,
            new_task_title: String::new(),
            new_task_description: String::new(),
            delete_confirmation: None,
            error_message: None,
            info_message: None,
            popup: None,
            show_help: false,
            pending_moves: Vec::new(),
            last_sync: None,
            last_sync_error: None,
            action_tx,
        }
    }

    pub fn tasks(&self, section: Section) -> &[Task] {
        self.engine.sections().get(section)
    }

    pub fn selected_index(&self, section: Section) -> usize {
        match section {
            Section::Active => self.selected_active,
            Section::Completed => self.selected_completed,
        }
    }

    fn selected_index_mut(&mut self, section: Section) -> &mut usize {
        match section {
            Section::Active => &mut self.selected_active,
            Section::Completed => &mut self.selected_completed,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks(self.focus).get(self.selected_index(self.focus))
    }

    pub fn is_syncing(&self) -> bool {
        self.engine.is_syncing()
    }

    pub fn is_pending(&self, task: &Task) -> bool {
        self.pending_moves.iter().any(|r| task.matches(r))
    }

    // Navigation

    pub fn next_task(&mut self) {
        let len = self.tasks(self.focus).len();
        let index = self.selected_index_mut(self.focus);
        if len > 0 && *index + 1 < len {
            *index += 1;
        }
    }

    pub fn previous_task(&mut self) {
        let index = self.selected_index_mut(self.focus);
        *index = index.saturating_sub(1);
    }

    pub fn focus_section(&mut self, section: Section) {
        self.focus = section;
        self.clamp_selection();
    }

    pub fn toggle_focus(&mut self) {
        self.focus_section(self.focus.other());
    }

    fn clamp_selection(&mut self) {
        for section in Section::ALL {
            let len = self.tasks(section).len();
            let index = self.selected_index_mut(section);
            if *index >= len {
                *index = len.saturating_sub(1);
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    // Sync

    /// Start a background sync unless one is already running
    pub fn request_sync(&mut self) -> bool {
        self.engine.spawn_sync(&self.action_tx, Action::SyncFinished)
    }

    // Moves

    /// Move the selected task to the other section
    pub fn move_selected(&mut self) {
        let destination = self.focus.other();
        self.move_selected_to(destination);
    }

    /// Move the selected task to `destination`.
    ///
    /// Local-only tasks move at once. Remote-backed tasks move only after the
    /// remote call, which runs on a worker, reports success.
    pub fn move_selected_to(&mut self, destination: Section) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if self.is_pending(task) {
            return;
        }
        let task_ref = TaskRef::from(task);

        let plan = match self.engine.plan_move(&task_ref, destination) {
            Ok(plan) => plan,
            Err(e) => {
                self.error_message = Some(format!("{ERROR_MOVE_FAILED}\n{e}"));
                return;
            }
        };
        if plan.is_noop() {
            return;
        }

        if plan.remote.is_none() {
            let result = self.engine.commit_move(&plan);
            self.finish_move(&plan, result);
            return;
        }

        self.pending_moves.push(plan.task.clone());
        let remote = self.engine.remote();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = remote.execute(&plan).await;
            let _ = tx.send(Action::MoveFinished { plan, result });
        });
    }

    fn finish_move(&mut self, plan: &MovePlan, result: Result<(), MoveError>) {
        match result {
            Ok(()) => {
                let message = match plan.to {
                    Section::Completed => format!("{SUCCESS_TASK_COMPLETED}: {}", plan.task.title),
                    Section::Active => format!("{SUCCESS_TASK_REOPENED}: {}", plan.task.title),
                };
                self.show_popup(message);
            }
            Err(e) => {
                warn!("Move of '{}' failed: {e}", plan.task.title);
                self.error_message = Some(format!("{ERROR_MOVE_FAILED}\n{e}"));
            }
        }
        self.clamp_selection();
    }

    // Add / delete

    pub fn start_task_creation(&mut self) {
        self.creating_task = true;
        self.input_field = InputField::Title;
        self.new_task_title.clear();
        self.new_task_description.clear();
    }

    pub fn cancel_task_creation(&mut self) {
        self.creating_task = false;
        self.new_task_title.clear();
        self.new_task_description.clear();
    }

    pub fn submit_new_task(&mut self) {
        if self.engine.add(&self.new_task_title, &self.new_task_description) {
            self.show_popup(format!("{SUCCESS_TASK_ADDED}: {}", self.new_task_title.trim()));
            self.cancel_task_creation();
            self.focus = Section::Active;
            self.selected_active = self.tasks(Section::Active).len().saturating_sub(1);
        } else {
            self.error_message = Some(ERROR_TASK_TITLE_EMPTY.to_string());
        }
    }

    /// Ask to delete the selected card.
    ///
    /// Deletion goes by title, so it is only offered when the selected card
    /// is the first one with that title.
    pub fn request_delete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let title = task.title.clone();
        let first_match = self.engine.sections().locate(&TaskRef::by_title(title.as_str()));
        if first_match == Some((self.focus, self.selected_index(self.focus))) {
            self.delete_confirmation = Some(title);
        } else {
            self.error_message = Some(format!("{ERROR_TASK_DELETE_SHADOWED}: {title}"));
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(title) = self.delete_confirmation.take() else {
            return;
        };
        if self.engine.delete(&title) {
            self.show_popup(format!("{SUCCESS_TASK_DELETED}: {title}"));
        } else {
            self.error_message = Some(format!("{ERROR_TASK_DELETE_FAILED}: {title}"));
        }
        self.clamp_selection();
    }

    // Worker results

    /// Apply a message sent by a background worker
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::SyncFinished(Ok(Some(snapshot))) => {
                // A snapshot older than the last committed move is dropped;
                // the next tick brings a fresh one.
                if self.engine.apply_snapshot(snapshot) {
                    self.last_sync = Some(Local::now());
                }
                self.last_sync_error = None;
                self.clamp_selection();
            }
            Action::SyncFinished(Ok(None)) => {
                self.last_sync = Some(Local::now());
            }
            Action::SyncFinished(Err(e)) => {
                // Background failures stay in the status bar; the next tick retries.
                self.last_sync_error = Some(e.to_string());
            }
            Action::MoveFinished { plan, result } => {
                self.pending_moves.retain(|r| r != &plan.task);
                let result = match result {
                    Ok(()) => match self.engine.commit_move(&plan) {
                        // The remote already changed; the next sync shows the card
                        Err(MoveError::TaskNotFound(_)) => {
                            debug!("'{}' left the board before its move was committed", plan.task.title);
                            Ok(())
                        }
                        other => other,
                    },
                    Err(e) => Err(e),
                };
                self.finish_move(&plan, result);
            }
            Action::AuthPrompt(url) => {
                info!("Showing authorization prompt");
                self.info_message = Some(format!("{AUTH_PROMPT}\n{url}"));
            }
        }
    }

    // Messages

    pub fn show_popup(&mut self, message: String) {
        self.popup = Some(Popup {
            message,
            until: Instant::now() + self.popup_duration,
        });
    }

    /// Expire the popup once its time is up
    pub fn tick(&mut self, now: Instant) {
        if self.popup.as_ref().is_some_and(|p| now >= p.until) {
            self.popup = None;
        }
    }

    pub fn dismiss_messages(&mut self) {
        self.error_message = None;
        self.info_message = None;
    }
}
