//! Terminal setup and the main UI loop

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{backend::Backend, backend::CrosstermBackend, style::Style, widgets::Block, Frame, Terminal};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use super::actions::Action;
use super::app::App;
use super::components::{
    DeleteConfirmationDialog, ErrorDialog, HelpPanel, InfoDialog, PopupToast, SectionColumn, StatusBar,
    TaskCreationDialog,
};
use super::events::handle_events;
use super::layout::LayoutManager;
use super::theme::{Theme, ThemeKind};
use crate::config::Config;
use crate::entities::Section;
use crate::sync::{Reconciler, SyncSchedule};

/// Run the board until the user quits.
///
/// `prompt_rx` carries consent URLs from the authorizer so a re-authorization
/// triggered mid-session shows up in a dialog.
pub async fn run_app(
    config: &Config,
    engine: Reconciler,
    prompt_rx: Option<mpsc::UnboundedReceiver<String>>,
) -> Result<()> {
    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let kind = config.ui.theme.parse::<ThemeKind>().unwrap_or_default();
    let mut app = App::new(engine, &config.ui, Theme::from_kind(kind), action_tx);
    let mut schedule = SyncSchedule::new(Instant::now(), config.sync.initial_delay(), config.sync.interval());

    let res = run_ui(&mut terminal, &mut app, &mut schedule, action_rx, prompt_rx).await;

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_ui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    schedule: &mut SyncSchedule,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    mut prompt_rx: Option<mpsc::UnboundedReceiver<String>>,
) -> Result<()> {
    info!("Board started");
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        // Poll with a timeout so worker results and timers are serviced
        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;
            handle_events(event, app);
        }

        while let Ok(action) = action_rx.try_recv() {
            app.handle_action(action);
        }
        if let Some(rx) = prompt_rx.as_mut() {
            while let Ok(url) = rx.try_recv() {
                app.handle_action(Action::AuthPrompt(url));
            }
        }

        let now = Instant::now();
        if schedule.poll(now) && !app.request_sync() {
            debug!("Scheduled sync skipped");
        }
        app.tick(now);

        if app.should_quit {
            break;
        }
        // Let spawned workers make progress on a busy runtime
        tokio::task::yield_now().await;
    }
    info!("Board closed");
    Ok(())
}

/// Draw the whole screen for the current state
pub fn render_ui(f: &mut Frame, app: &App) {
    let theme = app.theme;
    f.render_widget(Block::default().style(Style::default().bg(theme.bg)), f.area());

    let (board_area, status_area) = LayoutManager::main_layout(f.area());
    let (active_area, completed_area) = LayoutManager::board_layout(board_area);

    SectionColumn::render(f, active_area, app, Section::Active);
    SectionColumn::render(f, completed_area, app, Section::Completed);
    StatusBar::render(f, status_area, app);
    PopupToast::render(f, app);

    // Overlays, topmost last
    if app.show_help {
        HelpPanel::render(f, app);
    }
    if app.delete_confirmation.is_some() {
        DeleteConfirmationDialog::render(f, app);
    }
    if app.creating_task {
        TaskCreationDialog::render(f, app);
    }
    if app.info_message.is_some() {
        InfoDialog::render(f, app);
    }
    if app.error_message.is_some() {
        ErrorDialog::render(f, app);
    }
}
