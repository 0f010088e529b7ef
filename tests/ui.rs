mod common;

use common::{active, done, unauthorized, FakeClient};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use std::time::{Duration, Instant};
use taskboard::config::UiConfig;
use taskboard::entities::Section;
use taskboard::sync::Reconciler;
use taskboard::ui::{handle_events, render_ui, Action, App, Theme, ThemeKind};
use tokio::sync::mpsc;

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        handle_events(key(KeyCode::Char(c)), app);
    }
}

async fn app_with(client: Arc<FakeClient>) -> (App, mpsc::UnboundedReceiver<Action>) {
    let mut engine = Reconciler::new(client, Duration::from_secs(5));
    engine.load_from_remote().await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(engine, &UiConfig::default(), Theme::default(), tx);
    (app, rx)
}

fn board_client() -> Arc<FakeClient> {
    Arc::new(FakeClient::with_tasks(
        "list-1",
        vec![
            active("a1", "Write report"),
            active("a2", "Call plumber"),
            done("c1", "Pay rent", "2024-01-01T00:00:00Z"),
        ],
    ))
}

fn screen_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| render_ui(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[tokio::test]
async fn test_remote_move_waits_for_worker_result() {
    let client = board_client();
    let (mut app, mut rx) = app_with(client.clone()).await;

    handle_events(key(KeyCode::Char(' ')), &mut app);

    // Nothing moves until the worker reports back
    assert_eq!(app.tasks(Section::Active).len(), 2);
    assert_eq!(app.pending_moves.len(), 1);

    let action = rx.recv().await.unwrap();
    app.handle_action(action);

    assert!(app.pending_moves.is_empty());
    assert_eq!(app.tasks(Section::Active)[0].title, "Call plumber");
    assert!(app.tasks(Section::Completed).iter().any(|t| t.title == "Write report"));
    assert!(app.popup.as_ref().unwrap().message.contains("Write report"));
    assert_eq!(client.mutation_count(), 1);
}

#[tokio::test]
async fn test_failed_move_shows_error_and_keeps_board() {
    let client = board_client();
    client.push_mutation_result(Err(unauthorized()));
    client.push_mutation_result(Err(unauthorized()));
    let (mut app, mut rx) = app_with(client.clone()).await;
    let before = app.engine.sections().clone();

    handle_events(key(KeyCode::Char('c')), &mut app);
    let action = rx.recv().await.unwrap();
    app.handle_action(action);

    assert_eq!(app.engine.sections(), &before);
    assert!(app.error_message.is_some());
    assert!(app.popup.is_none());
    assert_eq!(client.reauthorize_count(), 1);

    // Any dismiss key clears the dialog
    handle_events(key(KeyCode::Esc), &mut app);
    assert!(app.error_message.is_none());
    assert!(!app.should_quit);
}

#[tokio::test]
async fn test_pending_task_cannot_be_moved_twice() {
    let client = Arc::new(FakeClient {
        hang_mutations: true,
        ..FakeClient::with_tasks("list-1", vec![active("a1", "Write report")])
    });
    let (mut app, _rx) = app_with(client.clone()).await;

    handle_events(key(KeyCode::Enter), &mut app);
    handle_events(key(KeyCode::Enter), &mut app);
    tokio::task::yield_now().await;

    assert_eq!(app.pending_moves.len(), 1);
    assert!(app.is_pending(&app.tasks(Section::Active)[0]));
    assert!(client.mutation_count() <= 1);
}

#[tokio::test]
async fn test_reopen_from_completed_column() {
    let client = board_client();
    let (mut app, mut rx) = app_with(client.clone()).await;

    handle_events(key(KeyCode::Char('l')), &mut app);
    assert_eq!(app.focus, Section::Completed);
    handle_events(key(KeyCode::Char('u')), &mut app);
    let action = rx.recv().await.unwrap();
    app.handle_action(action);

    assert!(app.tasks(Section::Completed).is_empty());
    assert_eq!(app.tasks(Section::Active).last().unwrap().title, "Pay rent");
    assert_eq!(client.calls.lock().unwrap().uncomplete.len(), 1);
}

#[tokio::test]
async fn test_add_and_move_local_task() {
    let client = board_client();
    let (mut app, _rx) = app_with(client.clone()).await;

    handle_events(key(KeyCode::Char('a')), &mut app);
    assert!(app.creating_task);
    type_text(&mut app, "Buy milk");
    handle_events(key(KeyCode::Tab), &mut app);
    type_text(&mut app, "2 litres");
    handle_events(key(KeyCode::Enter), &mut app);

    assert!(!app.creating_task);
    let added = app.selected_task().unwrap();
    assert_eq!(added.title, "Buy milk");
    assert_eq!(added.description, "2 litres");

    // Local tasks move at once, without a remote call
    handle_events(key(KeyCode::Char(' ')), &mut app);
    assert!(app.tasks(Section::Completed).iter().any(|t| t.title == "Buy milk"));
    assert!(app.pending_moves.is_empty());
    assert_eq!(client.mutation_count(), 0);
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let (mut app, _rx) = app_with(board_client()).await;

    handle_events(key(KeyCode::Char('a')), &mut app);
    type_text(&mut app, "   ");
    handle_events(key(KeyCode::Enter), &mut app);

    assert!(app.error_message.is_some());
    assert_eq!(app.tasks(Section::Active).len(), 2);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (mut app, _rx) = app_with(board_client()).await;

    handle_events(key(KeyCode::Char('j')), &mut app);
    handle_events(key(KeyCode::Char('d')), &mut app);
    assert_eq!(app.delete_confirmation.as_deref(), Some("Call plumber"));

    handle_events(key(KeyCode::Char('n')), &mut app);
    assert_eq!(app.tasks(Section::Active).len(), 2);

    handle_events(key(KeyCode::Char('d')), &mut app);
    handle_events(key(KeyCode::Char('y')), &mut app);
    assert_eq!(app.tasks(Section::Active).len(), 1);
    assert_eq!(app.selected_active, 0);
}

#[tokio::test]
async fn test_sync_results_are_applied_by_the_owner() {
    let client = board_client();
    let (mut app, mut rx) = app_with(client.clone()).await;

    client.set_tasks(vec![active("n1", "New from phone")]);
    assert!(app.request_sync());
    assert!(!app.request_sync());
    let action = rx.recv().await.unwrap();
    app.handle_action(action);

    assert_eq!(app.tasks(Section::Active)[0].title, "New from phone");
    assert!(app.tasks(Section::Completed).is_empty());
    assert!(app.last_sync.is_some());
    assert!(app.last_sync_error.is_none());
}

#[tokio::test]
async fn test_failed_sync_only_updates_status() {
    let client = board_client();
    let (mut app, mut rx) = app_with(client.clone()).await;
    let before = app.engine.sections().clone();

    client.fail_next_fetch(taskboard::backend::RemoteError::Network("offline".to_string()));
    app.request_sync();
    let action = rx.recv().await.unwrap();
    app.handle_action(action);

    assert_eq!(app.engine.sections(), &before);
    assert!(app.last_sync_error.as_deref().unwrap().contains("offline"));
    assert!(app.error_message.is_none());
}

#[tokio::test]
async fn test_auth_prompt_opens_info_dialog() {
    let (mut app, _rx) = app_with(board_client()).await;

    app.handle_action(Action::AuthPrompt("https://accounts.example/consent".to_string()));

    assert!(app.info_message.as_deref().unwrap().contains("https://accounts.example/consent"));
}

#[tokio::test]
async fn test_popup_expires() {
    let (mut app, _rx) = app_with(board_client()).await;

    app.show_popup("done".to_string());
    app.tick(Instant::now());
    assert!(app.popup.is_some());

    app.tick(Instant::now() + Duration::from_secs(60));
    assert!(app.popup.is_none());
}

#[tokio::test]
async fn test_theme_toggle_and_quit() {
    let (mut app, _rx) = app_with(board_client()).await;
    assert_eq!(app.theme.kind, ThemeKind::Light);

    handle_events(key(KeyCode::Char('t')), &mut app);
    assert_eq!(app.theme.kind, ThemeKind::Dark);

    handle_events(key(KeyCode::Char('q')), &mut app);
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_render_board() {
    let (mut app, _rx) = app_with(board_client()).await;

    let text = screen_text(&app);
    assert!(text.contains("Current tasks"));
    assert!(text.contains("Write report"));
    assert!(text.contains("Pay rent"));

    handle_events(key(KeyCode::Char('?')), &mut app);
    assert!(screen_text(&app).contains("Sync now"));
}

#[tokio::test]
async fn test_move_confirmed_after_sync_removed_card_is_not_an_error() {
    let client = board_client();
    let (mut app, mut rx) = app_with(client.clone()).await;

    handle_events(key(KeyCode::Char(' ')), &mut app);
    client.set_tasks(vec![active("a2", "Call plumber")]);
    assert!(app.request_sync());

    // Apply the sync first so the card is gone when the move reports back
    let mut actions = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
    actions.sort_by_key(|action| matches!(action, Action::MoveFinished { .. }));
    for action in actions {
        app.handle_action(action);
    }

    assert!(app.error_message.is_none());
    assert!(app.popup.as_ref().unwrap().message.contains("Write report"));
    assert!(app.pending_moves.is_empty());
    assert_eq!(app.tasks(Section::Active)[0].title, "Call plumber");
}

#[tokio::test]
async fn test_delete_only_offered_on_first_title_match() {
    let client = Arc::new(FakeClient::with_tasks(
        "list-1",
        vec![active("a1", "Errand"), done("c1", "Errand", "2024-01-01T00:00:00Z")],
    ));
    let (mut app, _rx) = app_with(client).await;

    handle_events(key(KeyCode::Char('l')), &mut app);
    handle_events(key(KeyCode::Char('d')), &mut app);
    assert!(app.delete_confirmation.is_none());
    assert!(app.error_message.is_some());
    assert_eq!(app.tasks(Section::Completed).len(), 1);

    handle_events(key(KeyCode::Esc), &mut app);
    handle_events(key(KeyCode::Char('h')), &mut app);
    handle_events(key(KeyCode::Char('d')), &mut app);
    handle_events(key(KeyCode::Char('y')), &mut app);
    assert!(app.tasks(Section::Active).is_empty());
    assert_eq!(app.tasks(Section::Completed)[0].id.as_deref(), Some("c1"));
}
