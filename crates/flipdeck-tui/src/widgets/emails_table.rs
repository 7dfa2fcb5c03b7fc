//! Emails tab — one row per purchase-flow account, with its step tag and
//! usage.

use crate::theme::Theme;
use flipdeck_core::EmailAccount;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block, Row, StatefulWidget, Table, TableState},
};

pub struct EmailsTable<'a> {
    accounts: &'a [EmailAccount],
    focused: bool,
    theme: &'a Theme,
}

impl<'a> EmailsTable<'a> {
    pub fn new(accounts: &'a [EmailAccount], focused: bool, theme: &'a Theme) -> Self {
        Self { accounts, focused, theme }
    }
}

impl StatefulWidget for EmailsTable<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TableState) {
        let t = self.theme;
        let rows = self.accounts.iter().map(|acc| {
            let last_fetch = acc
                .last_fetch
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());
            let cookies = if acc.cookies.is_some() { "yes" } else { "—" };
            Row::new(vec![
                acc.email.clone(),
                format!("{:.0}%", acc.usage_percent),
                acc.current_step.to_string(),
                acc.status_note.clone(),
                cookies.to_string(),
                last_fetch,
            ])
        });

        let border = if self.focused { t.border_focused } else { t.border_unfocused };
        let table = Table::new(
            rows,
            [
                Constraint::Min(24),
                Constraint::Length(6),
                Constraint::Length(14),
                Constraint::Min(16),
                Constraint::Length(7),
                Constraint::Length(16),
            ],
        )
        .header(
            Row::new(["email", "usage", "step", "note", "cookies", "last fetch"])
                .style(t.table_header),
        )
        .row_highlight_style(t.table_highlight)
        .block(
            Block::bordered()
                .title(format!(" Email accounts ({}) — d:delete ", self.accounts.len()))
                .border_style(border),
        );

        StatefulWidget::render(table, area, buf, state);
    }
}
