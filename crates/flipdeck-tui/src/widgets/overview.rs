//! Overview tab — totals across the whole operation.

use crate::theme::Theme;
use flipdeck_core::{AppState, ItemStatus};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Money and count totals derived from the current state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub revenue: f64,
    pub spent: f64,
    pub sold: usize,
    pub unsold: usize,
    pub refunded: usize,
    pub pending_refund: usize,
}

impl Totals {
    /// Revenue counts only `Sold` items; spend counts every item acquired,
    /// whatever its current status.
    pub fn from_state(state: &AppState) -> Self {
        let mut totals = Totals {
            revenue: 0.0,
            spent: 0.0,
            sold: 0,
            unsold: 0,
            refunded: 0,
            pending_refund: 0,
        };
        for item in &state.inventory {
            totals.spent += item.cost;
            match item.status {
                ItemStatus::Sold => {
                    totals.revenue += item.price;
                    totals.sold += 1;
                }
                ItemStatus::Unsold => totals.unsold += 1,
                ItemStatus::Refunded => totals.refunded += 1,
                ItemStatus::PendingRefund => totals.pending_refund += 1,
            }
        }
        totals
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.spent
    }
}

pub struct Overview<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Overview<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn card(&self, title: &str, lines: Vec<Line<'a>>) -> Paragraph<'a> {
        Paragraph::new(lines).block(
            Block::bordered()
                .title(format!(" {title} "))
                .border_style(self.theme.border_unfocused),
        )
    }
}

impl Widget for Overview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let totals = Totals::from_state(self.state);
        let t = self.theme;

        let row = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<14}"), t.summary_label),
                Span::styled(value, t.summary_value),
            ])
        };

        let profit = totals.profit();
        let profit_style = if profit >= 0.0 { t.summary_positive } else { t.summary_negative };

        let money = self.card(
            "Money",
            vec![
                row("revenue", format!("{:.2}", totals.revenue)),
                row("spent", format!("{:.2}", totals.spent)),
                Line::from(vec![
                    Span::styled(format!("{:<14}", "profit"), t.summary_label),
                    Span::styled(format!("{profit:+.2}"), profit_style),
                ]),
            ],
        );

        let stock = self.card(
            "Stock",
            vec![
                row("sold", totals.sold.to_string()),
                row("unsold", totals.unsold.to_string()),
                row("refunded", totals.refunded.to_string()),
                row("pending", totals.pending_refund.to_string()),
            ],
        );

        let plumbing = self.card(
            "Accounts",
            vec![
                row("emails", self.state.emails.len().to_string()),
                row("cards", self.state.payments.len().to_string()),
                row("logs", self.state.logs.len().to_string()),
            ],
        );

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(area);

        money.render(cols[0], buf);
        stock.render(cols[1], buf);
        plumbing.render(cols[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flipdeck_core::InventoryItem;

    fn item(status: ItemStatus, cost: f64, price: f64) -> InventoryItem {
        InventoryItem {
            id: format!("{status}-{cost}-{price}"),
            account_user: "u".into(),
            account_pass: "p".into(),
            status,
            cost,
            price,
            units: 0.0,
            updated_at: Utc::now(),
            email_used: None,
            card_used: None,
            refund_reason: None,
        }
    }

    #[test]
    fn revenue_counts_only_sold_items() {
        let mut state = AppState::default();
        state.add_inventory(item(ItemStatus::Sold, 4.0, 10.0));
        state.add_inventory(item(ItemStatus::Unsold, 3.0, 9.0));
        state.add_inventory(item(ItemStatus::Refunded, 2.0, 8.0));

        let totals = Totals::from_state(&state);
        assert_eq!(totals.revenue, 10.0);
        assert_eq!(totals.spent, 9.0);
        assert_eq!(totals.profit(), 1.0);
        assert_eq!((totals.sold, totals.unsold, totals.refunded), (1, 1, 1));
    }
}
