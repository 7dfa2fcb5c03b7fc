//! Logs tab — the merged, newest-first message feed across all accounts,
//! plus a detail popup for the selected entry.

use crate::theme::Theme;
use flipdeck_core::EmailLog;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Row, StatefulWidget, Table, TableState, Widget, Wrap},
};

/// The logs visible under an optional account scope, in stored (newest-first)
/// order. Row indices into the returned view are what the table selection
/// state refers to while the scope is active.
pub fn visible<'a>(logs: &'a [EmailLog], account: Option<&str>) -> Vec<&'a EmailLog> {
    match account {
        None => logs.iter().collect(),
        Some(id) => logs.iter().filter(|log| log.account_id == id).collect(),
    }
}

pub struct LogList<'a> {
    logs: &'a [&'a EmailLog],
    /// Human-readable label of the active account scope, shown in the title.
    scope: Option<&'a str>,
    focused: bool,
    show_snippets: bool,
    timestamp_format: &'a str,
    theme: &'a Theme,
}

impl<'a> LogList<'a> {
    pub fn new(
        logs: &'a [&'a EmailLog],
        scope: Option<&'a str>,
        focused: bool,
        show_snippets: bool,
        timestamp_format: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self { logs, scope, focused, show_snippets, timestamp_format, theme }
    }
}

impl StatefulWidget for LogList<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TableState) {
        let t = self.theme;
        let rows = self.logs.iter().map(|log| {
            let mut cells = vec![
                Span::raw(log.created_at.format(self.timestamp_format).to_string()),
                Span::styled(log.account_id.clone(), t.account_style(&log.account_id)),
                Span::raw(log.subject.clone()),
                Span::raw(log.otp_code.as_deref().unwrap_or("").to_string()),
            ];
            if self.show_snippets {
                cells.push(Span::raw(log.snippet.clone()));
            }
            Row::new(cells)
        });

        let mut widths = vec![
            Constraint::Length(17),
            Constraint::Length(10),
            Constraint::Min(24),
            Constraint::Length(8),
        ];
        let mut header = vec!["received", "account", "subject", "otp"];
        if self.show_snippets {
            widths.push(Constraint::Min(20));
            header.push("snippet");
        }

        let border = if self.focused { t.border_focused } else { t.border_unfocused };
        let title = match self.scope {
            Some(label) => format!(" Logs: {label} ({}) — f:clear ", self.logs.len()),
            None => format!(" Logs ({}) — Enter:detail  f:filter ", self.logs.len()),
        };
        let table = Table::new(rows, widths)
            .header(Row::new(header).style(t.table_header))
            .row_highlight_style(t.table_highlight)
            .block(Block::bordered().title(title).border_style(border));

        StatefulWidget::render(table, area, buf, state);
    }
}

/// Centred popup with the full fields of one log entry.
pub struct LogDetailPopup<'a> {
    log: &'a EmailLog,
    theme: &'a Theme,
}

impl<'a> LogDetailPopup<'a> {
    pub fn new(log: &'a EmailLog, theme: &'a Theme) -> Self {
        Self { log, theme }
    }
}

impl Widget for LogDetailPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(70, 16, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" log detail (Esc to close) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let field = |name: &'static str, value: String| {
            Line::from(vec![
                Span::styled(
                    format!("{name:<10}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(value),
            ])
        };

        let log = self.log;
        let mut lines = vec![
            field("id", log.id.clone()),
            field("account", log.account_id.clone()),
            field("received", log.created_at.to_rfc3339()),
            field("subject", log.subject.clone()),
            field("status", log.status.clone()),
            field("otp", log.otp_code.clone().unwrap_or_else(|| "—".into())),
        ];
        if !log.snippet.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::raw(log.snippet.clone())));
        }
        if log.body_html.is_some() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "(html body stored)",
                Style::default().add_modifier(Modifier::DIM),
            )));
        }

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: &str, account: &str) -> EmailLog {
        EmailLog {
            id: id.into(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
            subject: "Welcome".into(),
            snippet: String::new(),
            status: "unread".into(),
            account_id: account.into(),
            otp_code: None,
            body_html: None,
        }
    }

    #[test]
    fn visible_scopes_to_one_account_and_keeps_order() {
        let logs = vec![log("l1", "e1"), log("l2", "e2"), log("l3", "e1")];

        let all = visible(&logs, None);
        assert_eq!(all.len(), 3);

        let scoped = visible(&logs, Some("e1"));
        let ids: Vec<&str> = scoped.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["l1", "l3"]);

        assert!(visible(&logs, Some("nobody")).is_empty());
    }
}
