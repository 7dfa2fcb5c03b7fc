//! Semantic application events — crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Keybindings
//!
//! | Key(s)              | Event          |
//! |---------------------|----------------|
//! | `q`, `Ctrl+c`       | `Quit`         |
//! | `Tab`, `→`, `l`     | `NextTab`      |
//! | `BackTab`, `←`, `h` | `PrevTab`      |
//! | `1`–`5`             | `GoToTab(n)`   |
//! | `↑` / `k`           | `RowUp`        |
//! | `↓` / `j`           | `RowDown`      |
//! | `a`                 | `AddRecord`    |
//! | `e`                 | `EditRecord`   |
//! | `f`                 | `FilterLogs`   |
//! | `d`, `Delete`       | `DeleteRow`    |
//! | `Enter`             | `Inspect`      |
//! | `?`                 | `Help`         |
//! | `Escape`            | `Escape`       |
//! | terminal resize     | `Resize(w, h)` |
//!
//! ## Insert mode
//!
//! While a record form is open the event loop calls [`to_app_event_insert`]
//! instead. In insert mode every printable character forwards as `Char` so
//! the user can type freely (including letters that are bindings in normal
//! mode); `Tab`/`↓` and `BackTab`/`↑` become field navigation (`RowDown` /
//! `RowUp`); only `Ctrl+c`, `Escape`, `Enter`, and `Backspace` keep their
//! special meanings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

/// A semantic application event derived from a raw crossterm [`Event`].
///
/// Widgets and the app shell match on `AppEvent` values — they never
/// inspect crossterm types directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Exit the application.
    Quit,
    /// Switch to the next tab (wraps).
    NextTab,
    /// Switch to the previous tab (wraps).
    PrevTab,
    /// Jump directly to tab `n` (0-based).
    GoToTab(usize),
    /// Move the row cursor up in the active table (previous field while a
    /// form is open).
    RowUp,
    /// Move the row cursor down in the active table (next field while a
    /// form is open).
    RowDown,
    /// Open an add form for the active tab's collection.
    AddRecord,
    /// Open an edit form for the selected row (email accounts only).
    EditRecord,
    /// Scope the logs view to the selected account, or clear the scope.
    FilterLogs,
    /// Delete the selected row (where the active tab supports it).
    DeleteRow,
    /// Toggle the detail view of the selected row; submit while a form is
    /// open.
    Inspect,
    /// Toggle the help popup.
    Help,
    /// Dismiss the active popup.
    Escape,
    /// A printable character forwarded to the active text input.
    Char(char),
    /// Delete the character before the cursor in the active text input.
    Backspace,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`].
///
/// Returns `None` for events with no meaning here (mouse events,
/// key releases, unbound keys).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input
/// ("insert") mode. Call this variant while a record form is open.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(AppEvent::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(AppEvent::Quit),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(AppEvent::NextTab),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(AppEvent::PrevTab),
        KeyCode::Char(c @ '1'..='5') => {
            Some(AppEvent::GoToTab(c as usize - '1' as usize))
        }
        KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::RowUp),
        KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::RowDown),
        KeyCode::Char('a') => Some(AppEvent::AddRecord),
        KeyCode::Char('e') => Some(AppEvent::EditRecord),
        KeyCode::Char('f') => Some(AppEvent::FilterLogs),
        KeyCode::Char('d') | KeyCode::Delete => Some(AppEvent::DeleteRow),
        KeyCode::Enter => Some(AppEvent::Inspect),
        KeyCode::Char('?') => Some(AppEvent::Help),
        KeyCode::Esc => Some(AppEvent::Escape),
        _ => None,
    }
}

/// Key mapping for insert mode. Every printable character — including
/// letters that are bindings in normal mode — forwards verbatim.
fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(AppEvent::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => Some(AppEvent::RowDown),
        KeyCode::BackTab | KeyCode::Up => Some(AppEvent::RowUp),
        KeyCode::Char(c) => Some(AppEvent::Char(c)),
        KeyCode::Backspace => Some(AppEvent::Backspace),
        KeyCode::Enter => Some(AppEvent::Inspect),
        KeyCode::Esc => Some(AppEvent::Escape),
        _ => None,
    }
}
