//! Tab bar widget — the 1-line strip of dashboard sections at the top.

use crate::app::Tab;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Tabs, Widget},
};

/// Renders the section strip. The active tab is highlighted; keybinding
/// hints are right-aligned in the same row.
pub struct TabBar<'a> {
    active: Tab,
    _theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(active: Tab, theme: &'a Theme) -> Self {
        Self { active, _theme: theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!(" {}:{} ", i + 1, tab.label())))
            .collect();

        Tabs::new(labels)
            .select(self.active as usize)
            .highlight_style(
                Style::default()
                    .bg(ratatui::style::Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("")
            .render(area, buf);

        let hint = " q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
