//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Every tick the loop also
//! empties the ingest drain, so externally pushed log batches are merged on
//! this thread, in event order, like every other mutation.

use crate::{
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        emails_table::EmailsTable,
        form::{FormPopup, FormRecord, FormState},
        help::HelpPopup,
        inventory_table::InventoryTable,
        log_list::{self, LogDetailPopup, LogList},
        overview::Overview,
        payments_table::PaymentsTable,
        tab_bar::TabBar,
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flipdeck_core::{config::Config, Store};
use flipdeck_ingest::LogDrain;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout},
    widgets::{Paragraph, TableState},
    Frame, Terminal,
};
use std::{io, time::Duration};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

/// Dashboard sections, in tab-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Inventory,
    Payments,
    Emails,
    Logs,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Inventory,
        Tab::Payments,
        Tab::Emails,
        Tab::Logs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Inventory => "stock",
            Tab::Payments => "payments",
            Tab::Emails => "emails",
            Tab::Logs => "logs",
        }
    }

    fn next(self) -> Tab {
        let i = self as usize;
        Tab::ALL[(i + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        let i = self as usize;
        Tab::ALL[(i + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Row cursors, one per table-backed tab.
#[derive(Default)]
pub struct Tables {
    pub inventory: TableState,
    pub payments: TableState,
    pub emails: TableState,
    pub logs: TableState,
}

/// One line of feedback at the bottom of the screen.
pub struct StatusLine {
    pub text: String,
    pub warning: bool,
}

pub struct AppState {
    pub store: Store,
    pub drain: LogDrain,
    pub config: Config,
    pub theme: Theme,
    pub tab: Tab,
    pub tables: Tables,
    pub show_help: bool,
    /// Log detail popup for the selected log row.
    pub show_detail: bool,
    /// Open record form; the event loop switches to insert-mode key mapping
    /// while this is `Some`.
    pub form: Option<FormState>,
    /// Account id the logs tab is scoped to, when it is.
    pub log_filter: Option<String>,
    pub status: Option<StatusLine>,
    pub quit: bool,
}

impl AppState {
    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine { text: text.into(), warning: false });
    }

    fn warn(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine { text: text.into(), warning: true });
    }

    /// Number of rows in the active tab's table. The logs count respects the
    /// account scope, matching the rows the table actually shows.
    fn active_len(&self) -> usize {
        match self.tab {
            Tab::Overview => 0,
            Tab::Inventory => self.store.inventory().len(),
            Tab::Payments => self.store.payments().len(),
            Tab::Emails => self.store.emails().len(),
            Tab::Logs => self.visible_logs().len(),
        }
    }

    /// The logs shown by the logs tab under the current account scope.
    fn visible_logs(&self) -> Vec<&flipdeck_core::EmailLog> {
        log_list::visible(self.store.logs(), self.log_filter.as_deref())
    }

    /// Email address for an account id, falling back to the id for accounts
    /// that were deleted but still have logs.
    fn account_label(&self, id: &str) -> String {
        self.store
            .emails()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.email.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn active_table(&mut self) -> Option<&mut TableState> {
        match self.tab {
            Tab::Overview => None,
            Tab::Inventory => Some(&mut self.tables.inventory),
            Tab::Payments => Some(&mut self.tables.payments),
            Tab::Emails => Some(&mut self.tables.emails),
            Tab::Logs => Some(&mut self.tables.logs),
        }
    }

    fn move_row(&mut self, delta: isize) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        if let Some(table) = self.active_table() {
            let current = table.selected().unwrap_or(0) as isize;
            let next = (current + delta).clamp(0, len as isize - 1) as usize;
            table.select(Some(next));
        }
    }

    /// Re-clamp the selection after the underlying collection changed.
    fn clamp_selection(&mut self) {
        let len = self.active_len();
        if let Some(table) = self.active_table() {
            match table.selected() {
                Some(_) if len == 0 => table.select(None),
                Some(i) if i >= len => table.select(Some(len - 1)),
                _ => {}
            }
        }
    }

    fn delete_selected(&mut self) {
        let Some(index) = self.active_table().and_then(|t| t.selected()) else {
            return;
        };
        // Logs and the overview have no delete operation.
        let result = match self.tab {
            Tab::Inventory => self
                .store
                .inventory()
                .get(index)
                .map(|i| i.id.clone())
                .map(|id| (id.clone(), self.store.delete_inventory(&id))),
            Tab::Payments => self
                .store
                .payments()
                .get(index)
                .map(|c| c.id.clone())
                .map(|id| (id.clone(), self.store.delete_payment(&id))),
            Tab::Emails => self
                .store
                .emails()
                .get(index)
                .map(|e| e.id.clone())
                .map(|id| (id.clone(), self.store.delete_email(&id))),
            Tab::Overview | Tab::Logs => None,
        };
        match result {
            Some((id, Ok(()))) => {
                tracing::debug!(tab = self.tab.label(), id = %id, "deleted row");
                self.info(format!("deleted {id}"));
            }
            Some((id, Err(err))) => {
                tracing::warn!(id = %id, error = %err, "snapshot write failed on delete");
                self.warn(format!("snapshot write failed ({err}); change kept in memory"));
            }
            None => {}
        }
        self.clamp_selection();
    }

    fn open_add_form(&mut self) {
        self.form = match self.tab {
            Tab::Inventory => Some(FormState::add_item()),
            Tab::Payments => Some(FormState::add_card()),
            Tab::Emails => Some(FormState::add_email()),
            Tab::Logs => {
                self.info("logs come from the ingest feed");
                None
            }
            Tab::Overview => None,
        };
    }

    fn open_edit_form(&mut self) {
        if self.tab != Tab::Emails {
            return;
        }
        if let Some(account) = self.tables.emails.selected().and_then(|i| self.store.emails().get(i))
        {
            self.form = Some(FormState::edit_email(account));
        }
    }

    /// Parse the open form and apply its record. Parse failures leave the
    /// form open with the offending field named in the status line.
    fn submit_form(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        match form.record() {
            Err(msg) => self.warn(msg),
            Ok(record) => {
                self.form = None;
                self.apply(record);
            }
        }
    }

    fn apply(&mut self, record: FormRecord) {
        let (desc, result) = match record {
            FormRecord::Item(item) => {
                (format!("added {}", item.id), self.store.add_inventory(item))
            }
            FormRecord::Card(card) => {
                (format!("added {}", card.id), self.store.add_payment(card))
            }
            FormRecord::Email(account) => {
                (format!("added {}", account.email), self.store.add_email(account))
            }
            FormRecord::EmailUpdate(account) => {
                (format!("updated {}", account.email), self.store.update_email(account))
            }
        };
        match result {
            Ok(()) => {
                tracing::debug!(tab = self.tab.label(), "form applied");
                self.info(desc);
            }
            Err(err) => {
                tracing::warn!(error = %err, "snapshot write failed on form submit");
                self.warn(format!("snapshot write failed ({err}); change kept in memory"));
            }
        }
        // Adds prepend, so land the cursor on the new row
        if let Some(table) = self.active_table() {
            table.select(Some(0));
        }
        self.clamp_selection();
    }

    /// `f` — scope the logs tab to one account, or clear the scope.
    ///
    /// On the emails tab this jumps straight to the logs tab scoped to the
    /// selected account; on the logs tab it toggles against the selected
    /// row's account.
    fn toggle_log_filter(&mut self) {
        match self.tab {
            Tab::Emails => {
                let Some(account) =
                    self.tables.emails.selected().and_then(|i| self.store.emails().get(i))
                else {
                    return;
                };
                let id = account.id.clone();
                let label = account.email.clone();
                self.log_filter = Some(id);
                self.tab = Tab::Logs;
                self.reset_log_cursor();
                self.info(format!("logs scoped to {label}"));
            }
            Tab::Logs => {
                if self.log_filter.take().is_some() {
                    self.reset_log_cursor();
                    self.info("log scope cleared");
                    return;
                }
                // No scope yet, so row indices map straight into the store
                let Some(log) =
                    self.tables.logs.selected().and_then(|i| self.store.logs().get(i))
                else {
                    return;
                };
                let id = log.account_id.clone();
                let label = self.account_label(&id);
                self.log_filter = Some(id);
                self.reset_log_cursor();
                self.info(format!("logs scoped to {label}"));
            }
            _ => {}
        }
    }

    /// Put the log cursor on the newest visible row after the scope changed.
    fn reset_log_cursor(&mut self) {
        let len = self.visible_logs().len();
        self.tables.logs.select(if len == 0 { None } else { Some(0) });
    }

    /// Merge every batch queued on the ingest drain. Runs once per tick.
    fn drain_ingest(&mut self) {
        let batches = self.drain.drain();
        if batches.is_empty() {
            return;
        }
        let before = self.store.logs().len();
        for batch in batches {
            if let Err(err) = self.store.add_logs(batch) {
                tracing::warn!(error = %err, "snapshot write failed on ingest");
                self.warn(format!("snapshot write failed ({err}); change kept in memory"));
                return;
            }
        }
        let added = self.store.logs().len() - before;
        tracing::debug!(added, "ingest drained");
        self.info(format!("ingested {added} new log(s)"));
        self.clamp_selection();
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(store: Store, drain: LogDrain, config: Config, theme: Theme) -> Self {
        App {
            state: AppState {
                store,
                drain,
                config,
                theme,
                tab: Tab::Overview,
                tables: Tables::default(),
                show_help: false,
                show_detail: false,
                form: None,
                log_filter: None,
                status: None,
                quit: false,
            },
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on
    /// exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.state.drain_ingest();

            {
                let s = &mut self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                // Insert-mode mapping while a form is open, so binding
                // letters type instead of triggering commands
                let map = if self.state.form.is_some() {
                    event::to_app_event_insert
                } else {
                    event::to_app_event
                };
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        if let Some(ev) = map(Event::Key(key)) {
                            tracing::debug!(tab = ?self.state.tab, event = ?ev, "key event");
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = map(other) {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Popups intercept all events; only close keys pass through.
        if s.form.is_some() {
            match event {
                AppEvent::Quit => s.quit = true,
                AppEvent::Escape => s.form = None,
                AppEvent::Inspect => s.submit_form(),
                AppEvent::RowDown => {
                    if let Some(form) = &mut s.form {
                        form.next_field();
                    }
                }
                AppEvent::RowUp => {
                    if let Some(form) = &mut s.form {
                        form.prev_field();
                    }
                }
                AppEvent::Char(c) => {
                    if let Some(form) = &mut s.form {
                        form.insert_char(c);
                    }
                }
                AppEvent::Backspace => {
                    if let Some(form) = &mut s.form {
                        form.backspace();
                    }
                }
                _ => {}
            }
            return;
        }
        if s.show_help {
            match event {
                AppEvent::Help | AppEvent::Escape | AppEvent::Quit => s.show_help = false,
                _ => {}
            }
            return;
        }
        if s.show_detail {
            match event {
                AppEvent::Inspect | AppEvent::Escape | AppEvent::Quit => s.show_detail = false,
                AppEvent::RowUp => {
                    s.move_row(-1);
                }
                AppEvent::RowDown => {
                    s.move_row(1);
                }
                _ => {}
            }
            return;
        }

        match event {
            AppEvent::Quit => s.quit = true,
            AppEvent::Help => s.show_help = true,
            AppEvent::NextTab => s.tab = s.tab.next(),
            AppEvent::PrevTab => s.tab = s.tab.prev(),
            AppEvent::GoToTab(n) => {
                if let Some(tab) = Tab::ALL.get(n) {
                    s.tab = *tab;
                }
            }
            AppEvent::RowUp => s.move_row(-1),
            AppEvent::RowDown => s.move_row(1),
            AppEvent::AddRecord => s.open_add_form(),
            AppEvent::EditRecord => s.open_edit_form(),
            AppEvent::FilterLogs => s.toggle_log_filter(),
            AppEvent::DeleteRow => s.delete_selected(),
            AppEvent::Inspect => {
                let selected = s.tables.logs.selected();
                if s.tab == Tab::Logs && selected.is_some_and(|i| i < s.visible_logs().len()) {
                    s.show_detail = true;
                }
            }
            AppEvent::Escape => s.status = None,
            // Only produced by the insert-mode mapping
            AppEvent::Char(_) | AppEvent::Backspace => {}
            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, s: &mut AppState) {
    let area = frame.area();

    // Vertical: 1-line tab bar | body | 1-line status
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(TabBar::new(s.tab, &s.theme), vert[0]);

    let AppState { store, config, theme, tables, tab, log_filter, .. } = s;
    match tab {
        Tab::Overview => {
            frame.render_widget(Overview::new(store.state(), theme), vert[1]);
        }
        Tab::Inventory => frame.render_stateful_widget(
            InventoryTable::new(store.inventory(), true, theme),
            vert[1],
            &mut tables.inventory,
        ),
        Tab::Payments => frame.render_stateful_widget(
            PaymentsTable::new(store.payments(), true, theme),
            vert[1],
            &mut tables.payments,
        ),
        Tab::Emails => frame.render_stateful_widget(
            EmailsTable::new(store.emails(), true, theme),
            vert[1],
            &mut tables.emails,
        ),
        Tab::Logs => {
            let visible = log_list::visible(store.logs(), log_filter.as_deref());
            let scope = log_filter.as_deref().map(|id| {
                store
                    .emails()
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| e.email.as_str())
                    .unwrap_or(id)
            });
            frame.render_stateful_widget(
                LogList::new(
                    &visible,
                    scope,
                    true,
                    config.ui.show_snippets,
                    &config.ui.timestamp_format,
                    theme,
                ),
                vert[1],
                &mut tables.logs,
            );
        }
    }

    // Status line
    if let Some(status) = &s.status {
        let style = if status.warning { s.theme.status_warning } else { s.theme.status_info };
        frame.render_widget(Paragraph::new(status.text.as_str()).style(style), vert[2]);
    }

    // Popups overlay the whole screen
    if s.show_detail {
        let visible = s.visible_logs();
        if let Some(log) = s.tables.logs.selected().and_then(|i| visible.get(i).copied()) {
            frame.render_widget(LogDetailPopup::new(log, &s.theme), area);
        }
    }
    if let Some(form) = &s.form {
        frame.render_widget(FormPopup::new(form, &s.theme), area);
    }
    if s.show_help {
        frame.render_widget(HelpPopup::new(&s.theme), area);
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
