//! Colour theme for the flipdeck TUI.
//!
//! The theme is a TOML file embedded in the binary via [`include_str!`], so
//! the application works without any files on disk. Call
//! [`Theme::load_default`] at startup and pass the result through the
//! application as a shared reference. All styles are pre-resolved ratatui
//! [`Style`] values — no allocation at render time.
//!
//! # Colour assignment for accounts
//!
//! Account ids are hashed to a stable index into the palette so the same
//! account always gets the same colour in the logs pane within a session,
//! regardless of the order accounts appear.

use config::{Config, File, FileFormat};
use flipdeck_core::ItemStatus;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawStatuses {
    sold: RawStyle,
    unsold: RawStyle,
    refunded: RawStyle,
    pending_refund: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    header: RawStyle,
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawStatusLine {
    info: RawStyle,
    warning: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    label: RawStyle,
    value: RawStyle,
    positive: RawStyle,
    negative: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawAccounts {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    statuses: RawStatuses,
    borders: RawBorders,
    table: RawTable,
    status_line: RawStatusLine,
    summary: RawSummary,
    accounts: RawAccounts,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Styles for each inventory sale status.
    pub status_sold: Style,
    pub status_unsold: Style,
    pub status_refunded: Style,
    pub status_pending_refund: Style,

    /// Border style for the active pane.
    pub border_focused: Style,
    /// Border style for inactive panes.
    pub border_unfocused: Style,

    pub table_header: Style,
    pub table_highlight: Style,

    /// Quiet status-line text.
    pub status_info: Style,
    /// Persistence-failure warning in the status line.
    pub status_warning: Style,

    pub summary_label: Style,
    pub summary_value: Style,
    pub summary_positive: Style,
    pub summary_negative: Style,

    /// Ordered colour palette used for account colour cycling in the logs
    /// pane.
    account_palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which a unit test rules
    /// out.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored so user
    /// themes stay forward-compatible.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            status_sold: raw.statuses.sold.into_style(),
            status_unsold: raw.statuses.unsold.into_style(),
            status_refunded: raw.statuses.refunded.into_style(),
            status_pending_refund: raw.statuses.pending_refund.into_style(),
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            table_header: raw.table.header.into_style(),
            table_highlight: raw.table.highlight.into_style(),
            status_info: raw.status_line.info.into_style(),
            status_warning: raw.status_line.warning.into_style(),
            summary_label: raw.summary.label.into_style(),
            summary_value: raw.summary.value.into_style(),
            summary_positive: raw.summary.positive.into_style(),
            summary_negative: raw.summary.negative.into_style(),
            account_palette: raw
                .accounts
                .palette
                .iter()
                .filter_map(|s| parse_color(s))
                .collect(),
        })
    }

    /// Return the [`Style`] for an inventory status tag.
    pub fn status_style(&self, status: ItemStatus) -> Style {
        match status {
            ItemStatus::Sold => self.status_sold,
            ItemStatus::Unsold => self.status_unsold,
            ItemStatus::Refunded => self.status_refunded,
            ItemStatus::PendingRefund => self.status_pending_refund,
        }
    }

    /// Return a stable [`Style`] for an account id.
    ///
    /// The colour is the hash of the id modulo the palette length, so the
    /// same account maps to the same colour regardless of the order
    /// accounts appear.
    pub fn account_style(&self, account_id: &str) -> Style {
        if self.account_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(account_id) % self.account_palette.len();
        Style::default().fg(self.account_palette[idx])
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Simple multiplicative hash that is stable across Rust versions and
/// process restarts, keeping account colour assignment deterministic.
fn stable_hash(s: &str) -> usize {
    s.bytes().fold(5381usize, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as usize)
    })
}

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts named terminal colours (case-insensitive), hex RGB (`#rrggbb`),
/// and 256-colour indexed (`indexed:N`).
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_loads() {
        let theme = Theme::load_default();
        assert_ne!(theme.status_sold, Style::default());
        assert_ne!(theme.border_focused, Style::default());
        assert_ne!(theme.status_warning, Style::default());
        assert!(!theme.account_palette.is_empty());
    }

    #[test]
    fn account_style_is_stable() {
        let theme = Theme::load_default();
        assert_eq!(theme.account_style("e1"), theme.account_style("e1"));
    }

    #[test]
    fn parse_hex_color() {
        assert_eq!(parse_color("#ff0080"), Some(Color::Rgb(255, 0, 128)));
    }

    #[test]
    fn parse_unknown_color_returns_none() {
        assert_eq!(parse_color("chartreuse"), None);
    }
}
