//! Payments tab — one row per stored card. Card numbers render masked down
//! to the last four digits; the full number never appears on screen.

use crate::theme::Theme;
use flipdeck_core::PaymentCard;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block, Row, StatefulWidget, Table, TableState},
};

pub struct PaymentsTable<'a> {
    cards: &'a [PaymentCard],
    focused: bool,
    theme: &'a Theme,
}

impl<'a> PaymentsTable<'a> {
    pub fn new(cards: &'a [PaymentCard], focused: bool, theme: &'a Theme) -> Self {
        Self { cards, focused, theme }
    }
}

/// `"4242424242424242"` → `"•••• 4242"`. Short inputs mask everything.
pub fn mask_card_number(number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return "••••".to_string();
    }
    format!("•••• {}", &digits[digits.len() - 4..])
}

impl StatefulWidget for PaymentsTable<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TableState) {
        let t = self.theme;
        let rows = self.cards.iter().map(|card| {
            Row::new(vec![
                card.card_name.clone(),
                mask_card_number(&card.card_number),
                card.expiry.clone(),
                "•••".to_string(),
            ])
        });

        let border = if self.focused { t.border_focused } else { t.border_unfocused };
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(5),
            ],
        )
        .header(Row::new(["holder", "number", "expiry", "cvv"]).style(t.table_header))
        .row_highlight_style(t.table_highlight)
        .block(
            Block::bordered()
                .title(format!(" Payments ({}) — d:delete ", self.cards.len()))
                .border_style(border),
        );

        StatefulWidget::render(table, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(mask_card_number("4242 4242 4242 4242"), "•••• 4242");
    }

    #[test]
    fn short_numbers_mask_entirely() {
        assert_eq!(mask_card_number("42"), "••••");
    }
}
