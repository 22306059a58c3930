//! Input handling for the TUI.
//!
//! Keys are dispatched by what is on screen: the help overlay captures
//! everything, then the detail overlay, then the listing view.

use crate::app::{App, AppEvent};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::open_focused_detail;
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.detail.selection().is_open {
        return handle_overlay_input(app, code);
    }

    handle_listing_input(app, code, event_tx)
}

/// Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
        app.show_help = false;
    }
    Action::Continue
}

fn handle_overlay_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => app.close_detail(),
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

fn handle_listing_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => app.focus_prev(),
        KeyCode::Char('l') | KeyCode::Right => app.cursor_right(),
        KeyCode::Char('h') | KeyCode::Left => app.cursor_left(),
        KeyCode::Enter => {
            if !open_focused_detail(app, event_tx) {
                app.set_status("Nothing to open in this row");
            }
        }
        _ => {}
    }
    Action::Continue
}
