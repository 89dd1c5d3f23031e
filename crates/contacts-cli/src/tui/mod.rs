//! Contacts TUI
//!
//! Terminal user interface for the contact list.
//!
//! ## Layout
//!
//! - Top: Add-contact form (name, phone)
//! - Middle: Search box
//! - Bottom: Contact list, with the editing row shown inline
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - g/G: Jump to first/last contact
//! - q: Quit
//!
//! ## Commands
//!
//! - a or Tab: Add contact (Tab switches field, Enter submits, Esc leaves)
//! - e or Enter: Edit contact inline (Enter saves, Esc cancels)
//! - d: Delete contact (asks for confirmation)
//! - /: Search by name or phone (Esc clears)
//! - r: Reload from the server
//!
//! Store calls run on spawned tasks so the screen keeps redrawing while a
//! request is outstanding; their completions come back over a channel.

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use contacts_core::{
    Command, Completion, Config, ContactStore, Controller, Request, RestContactStore, RowId,
};

use app::{App, Focus};

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if CONTACTS_LOG is set)
    init_tui_logging(&config);

    let store = RestContactStore::from_config(&config).context("Failed to create HTTP client")?;
    info!("Using contact store at {}", store.collection_url());
    let mut app = App::new(Controller::new(Arc::new(store)));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<Completion>();

    // Initial load
    if let Some(request) = app.handle(Command::Load) {
        spawn_request(app.controller.store(), request, &completion_tx);
    }

    loop {
        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle events with a short timeout
        tokio::select! {
            biased;

            // Finished store calls
            Some(completion) = completion_rx.recv() => {
                debug!("Request finished: {:?}", completion);
                app.complete(completion);
            }

            // Poll for terminal events
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                // Check for terminal events (non-blocking)
                if event::poll(std::time::Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        if let Some(command) = handle_key(app, key) {
                            if let Some(request) = app.handle(command) {
                                spawn_request(app.controller.store(), request, &completion_tx);
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Send a request off the UI task; its completion arrives on `tx`
fn spawn_request(
    store: Arc<dyn ContactStore>,
    request: Request,
    tx: &UnboundedSender<Completion>,
) {
    debug!("Sending {:?}", request);
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = request.send(&*store).await;
        // Receiver is gone only when the app is shutting down
        let _ = tx.send(completion);
    });
}

/// Translate a key press into a controller command, if any
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    // The confirmation only accepts an answer
    if app.controller.pending_confirmation().is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::ConfirmDelete),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Command::CancelDelete),
            _ => None,
        };
    }

    // If a notice is showing, any key dismisses it
    if app.controller.peek_notice().is_some() {
        app.controller.next_notice();
        return None;
    }

    // If help is showing, any key dismisses it
    if app.show_help {
        app.show_help = false;
        return None;
    }

    match app.focus {
        Focus::Form => handle_form_mode(app, key.code),
        Focus::Search => handle_search_mode(app, key.code),
        Focus::List => match app.editing {
            Some(row_id) => handle_edit_mode(app, row_id, key.code),
            None => handle_normal_mode(app, key.code),
        },
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.move_to_first();
            None
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.move_to_last();
            None
        }
        KeyCode::Char('a') | KeyCode::Tab => {
            app.enter_form();
            None
        }
        KeyCode::Char('/') => {
            app.enter_search();
            None
        }
        KeyCode::Char('e') | KeyCode::Enter => app.selected_row().map(Command::BeginEdit),
        KeyCode::Char('d') | KeyCode::Delete => app.selected_row().map(Command::RequestDelete),
        KeyCode::Char('r') => Some(Command::Load),
        KeyCode::Char('?') => {
            app.toggle_help();
            None
        }
        _ => None,
    }
}

fn handle_form_mode(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Esc => {
            app.exit_input_mode();
            None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.form_field = app.form_field.toggle();
            None
        }
        KeyCode::Enter => Some(Command::SubmitForm),
        KeyCode::Backspace => {
            app.delete_char();
            None
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
            None
        }
        _ => None,
    }
}

fn handle_search_mode(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Esc => {
            app.exit_input_mode();
            Some(Command::Search(String::new()))
        }
        KeyCode::Enter => {
            app.exit_input_mode();
            None
        }
        KeyCode::Backspace => Some(Command::Search(app.search_without_last())),
        KeyCode::Char(c) => Some(Command::Search(app.search_with(c))),
        _ => None,
    }
}

fn handle_edit_mode(app: &mut App, row_id: RowId, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Esc => Some(Command::Cancel(row_id)),
        KeyCode::Enter => Some(Command::Save(row_id)),
        KeyCode::Tab | KeyCode::BackTab => {
            app.edit_field = app.edit_field.toggle();
            None
        }
        KeyCode::Backspace => {
            app.delete_char();
            None
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
            None
        }
        _ => None,
    }
}

/// Initialize file-based logging for TUI mode
///
/// Logs go to a file since the terminal is owned by the UI.
fn init_tui_logging(config: &Config) {
    // Only log if CONTACTS_LOG is set
    let Ok(log_level) = std::env::var("CONTACTS_LOG") else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "contacts_core={},contacts_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use contacts_core::Contact;

    fn loaded_app() -> App {
        let store = RestContactStore::new("http://127.0.0.1:9").unwrap();
        let mut app = App::new(Controller::new(Arc::new(store)));
        app.handle(Command::Load);
        app.complete(Completion::Loaded(Ok(vec![
            Contact::new("1", "Ada", "111"),
            Contact::new("2", "Bob", "222"),
        ])));
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app();
        assert!(handle_key(&mut app, press(KeyCode::Char('q'))).is_none());
        assert!(app.should_quit);

        let mut app = loaded_app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_delete_asks_first() {
        let mut app = loaded_app();
        app.move_down();
        let row_id = app.selected_row().unwrap();

        let command = handle_key(&mut app, press(KeyCode::Char('d')));
        assert_eq!(command, Some(Command::RequestDelete(row_id)));
        assert!(app.handle(Command::RequestDelete(row_id)).is_none());

        // Unrelated keys are swallowed while the confirmation is up
        assert!(handle_key(&mut app, press(KeyCode::Char('q'))).is_none());
        assert!(!app.should_quit);

        assert_eq!(
            handle_key(&mut app, press(KeyCode::Char('y'))),
            Some(Command::ConfirmDelete)
        );
    }

    #[test]
    fn test_search_keystrokes() {
        let mut app = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('/')));
        assert_eq!(app.focus, Focus::Search);

        let command = handle_key(&mut app, press(KeyCode::Char('b'))).unwrap();
        assert_eq!(command, Command::Search("b".to_string()));
        app.handle(command);

        let command = handle_key(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(command, Command::Search(String::new()));
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn test_form_submit() {
        let mut app = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('a')));
        for c in "Carol".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Char('3')));

        assert_eq!(app.controller.form().name, "Carol");
        assert_eq!(app.controller.form().phone, "3");
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            Some(Command::SubmitForm)
        );
    }

    #[test]
    fn test_edit_keys() {
        let mut app = loaded_app();
        let row_id = app.selected_row().unwrap();

        let command = handle_key(&mut app, press(KeyCode::Char('e'))).unwrap();
        app.handle(command);
        assert_eq!(app.editing, Some(row_id));

        // 'q' types into the draft instead of quitting
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.should_quit);

        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            Some(Command::Save(row_id))
        );
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Esc)),
            Some(Command::Cancel(row_id))
        );
    }

    #[test]
    fn test_notice_dismissed_by_any_key() {
        let mut app = loaded_app();
        app.enter_form();
        // Empty form produces a validation notice
        app.handle(Command::SubmitForm);
        assert!(app.has_modal());

        assert!(handle_key(&mut app, press(KeyCode::Char('x'))).is_none());
        assert!(!app.has_modal());
        assert!(app.controller.form().name.is_empty());
    }
}
