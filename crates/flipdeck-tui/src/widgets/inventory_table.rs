//! Inventory tab — one row per resold unit.

use crate::theme::Theme;
use flipdeck_core::InventoryItem;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Row, StatefulWidget, Table, TableState},
};

pub struct InventoryTable<'a> {
    items: &'a [InventoryItem],
    focused: bool,
    theme: &'a Theme,
}

impl<'a> InventoryTable<'a> {
    pub fn new(items: &'a [InventoryItem], focused: bool, theme: &'a Theme) -> Self {
        Self { items, focused, theme }
    }
}

impl StatefulWidget for InventoryTable<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TableState) {
        let t = self.theme;
        let rows = self.items.iter().map(|item| {
            Row::new(vec![
                Span::raw(item.account_user.as_str()),
                Span::styled(item.status.to_string(), t.status_style(item.status)),
                Span::raw(format!("{:.2}", item.cost)),
                Span::raw(format!("{:.2}", item.price)),
                Span::raw(format!("{:.0}", item.units)),
                Span::raw(item.email_used.as_deref().unwrap_or("—").to_string()),
                Span::raw(item.updated_at.format("%Y-%m-%d %H:%M").to_string()),
            ])
        });

        let border = if self.focused { t.border_focused } else { t.border_unfocused };
        let table = Table::new(
            rows,
            [
                Constraint::Min(16),
                Constraint::Length(15),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Min(12),
                Constraint::Length(16),
            ],
        )
        .header(
            Row::new(["account", "status", "cost", "price", "units", "email", "updated"])
                .style(t.table_header),
        )
        .row_highlight_style(t.table_highlight)
        .block(
            Block::bordered()
                .title(format!(" Stock ({}) — d:delete ", self.items.len()))
                .border_style(border),
        );

        StatefulWidget::render(table, area, buf, state);
    }
}
