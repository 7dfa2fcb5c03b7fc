//! Record forms — centred popup with one text input per field.
//!
//! # Editing
//!
//! - `Char(c)` appends to the active field.
//! - `Backspace` deletes the last character of the active field.
//! - `RowDown` / `RowUp` (Tab/↓ and BackTab/↑, re-mapped by the App shell)
//!   move between fields, wrapping.
//! - `Enter` submits; `Escape` discards. Both are handled by the App shell,
//!   which calls [`FormState::record`] and applies the result to the store.

use crate::theme::Theme;
use chrono::Utc;
use flipdeck_core::{EmailAccount, EmailStep, InventoryItem, ItemStatus, PaymentCard};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Which record the open form produces on submit.
enum FormKind {
    AddItem,
    AddCard,
    AddEmail,
    /// Edit keeps the fields the form does not expose (id, cookies,
    /// last fetch) from the record being edited.
    EditEmail(EmailAccount),
}

struct Field {
    label: &'static str,
    value: String,
}

impl Field {
    fn empty(label: &'static str) -> Self {
        Field { label, value: String::new() }
    }

    fn filled(label: &'static str, value: impl Into<String>) -> Self {
        Field { label, value: value.into() }
    }
}

/// A parsed, ready-to-apply form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FormRecord {
    Item(InventoryItem),
    Card(PaymentCard),
    Email(EmailAccount),
    /// Full replacement for the account with the same id.
    EmailUpdate(EmailAccount),
}

/// State of the open record form. Lives on the app state while the popup is
/// up; the App shell routes insert-mode events here.
pub struct FormState {
    kind: FormKind,
    title: &'static str,
    fields: Vec<Field>,
    active: usize,
}

impl FormState {
    pub fn add_item() -> Self {
        FormState {
            kind: FormKind::AddItem,
            title: " add stock item ",
            fields: vec![
                Field::empty("account user"),
                Field::empty("account pass"),
                Field::empty("status"),
                Field::empty("cost"),
                Field::empty("price"),
                Field::empty("units"),
                Field::empty("email used"),
                Field::empty("card used"),
            ],
            active: 0,
        }
    }

    pub fn add_card() -> Self {
        FormState {
            kind: FormKind::AddCard,
            title: " add payment card ",
            fields: vec![
                Field::empty("card name"),
                Field::empty("card number"),
                Field::empty("expiry"),
                Field::empty("cvv"),
            ],
            active: 0,
        }
    }

    pub fn add_email() -> Self {
        FormState {
            kind: FormKind::AddEmail,
            title: " add email account ",
            fields: vec![
                Field::empty("email"),
                Field::empty("usage %"),
                Field::empty("step"),
                Field::empty("note"),
            ],
            active: 0,
        }
    }

    /// Edit form prefilled from an existing account.
    pub fn edit_email(account: &EmailAccount) -> Self {
        FormState {
            kind: FormKind::EditEmail(account.clone()),
            title: " edit email account ",
            fields: vec![
                Field::filled("email", &account.email),
                Field::filled("usage %", account.usage_percent.to_string()),
                Field::filled("step", account.current_step.to_string()),
                Field::filled("note", &account.status_note),
            ],
            active: 0,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.fields[self.active].value.push(c);
    }

    pub fn backspace(&mut self) {
        self.fields[self.active].value.pop();
    }

    pub fn next_field(&mut self) {
        self.active = (self.active + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.active = (self.active + self.fields.len() - 1) % self.fields.len();
    }

    fn text(&self, index: usize) -> &str {
        self.fields[index].value.trim()
    }

    fn optional(&self, index: usize) -> Option<String> {
        let v = self.text(index);
        (!v.is_empty()).then(|| v.to_string())
    }

    /// Parse a numeric field. Blank counts as zero.
    fn number(&self, index: usize) -> Result<f64, String> {
        let v = self.text(index);
        if v.is_empty() {
            return Ok(0.0);
        }
        v.parse()
            .map_err(|_| format!("{}: not a number", self.fields[index].label))
    }

    fn required(&self, index: usize) -> Result<String, String> {
        let v = self.text(index);
        if v.is_empty() {
            return Err(format!("{}: required", self.fields[index].label));
        }
        Ok(v.to_string())
    }

    /// Build the record from the current field values.
    ///
    /// Errors name the offending field; the form stays open so the user can
    /// correct it.
    pub fn record(&self) -> Result<FormRecord, String> {
        match &self.kind {
            FormKind::AddItem => {
                let status: ItemStatus = match self.text(2) {
                    "" => ItemStatus::Unsold,
                    s => s.parse().map_err(|e| format!("status: {e}"))?,
                };
                Ok(FormRecord::Item(InventoryItem {
                    id: next_id("inv"),
                    account_user: self.required(0)?,
                    account_pass: self.text(1).to_string(),
                    status,
                    cost: self.number(3)?,
                    price: self.number(4)?,
                    units: self.number(5)?,
                    updated_at: Utc::now(),
                    email_used: self.optional(6),
                    card_used: self.optional(7),
                    refund_reason: None,
                }))
            }
            FormKind::AddCard => Ok(FormRecord::Card(PaymentCard {
                id: next_id("card"),
                card_name: self.text(0).to_string(),
                card_number: self.required(1)?,
                expiry: self.text(2).to_string(),
                cvv: self.text(3).to_string(),
            })),
            FormKind::AddEmail => Ok(FormRecord::Email(EmailAccount {
                id: next_id("acct"),
                email: self.required(0)?,
                usage_percent: self.number(1)?,
                current_step: self.step(2)?,
                status_note: self.text(3).to_string(),
                cookies: None,
                last_fetch: None,
            })),
            FormKind::EditEmail(original) => Ok(FormRecord::EmailUpdate(EmailAccount {
                email: self.required(0)?,
                usage_percent: self.number(1)?,
                current_step: self.step(2)?,
                status_note: self.text(3).to_string(),
                ..original.clone()
            })),
        }
    }

    fn step(&self, index: usize) -> Result<EmailStep, String> {
        match self.text(index) {
            "" => Ok(EmailStep::Ready),
            s => s.parse().map_err(|e| format!("step: {e}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct FormPopup<'a> {
    state: &'a FormState,
    theme: &'a Theme,
}

impl<'a> FormPopup<'a> {
    pub fn new(state: &'a FormState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for FormPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = self.state.fields.len() as u16 + 4;
        let popup = centered_rect(52, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(format!("{}(Enter:save  Esc:cancel) ", self.state.title))
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines: Vec<Line> = self
            .state
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let label = Span::styled(
                    format!(" {:<13}", field.label),
                    Style::default().add_modifier(Modifier::BOLD),
                );
                let mut value = field.value.clone();
                if i == self.state.active {
                    value.push('▏');
                    Line::from(vec![label, Span::styled(value, self.theme.table_highlight)])
                } else {
                    Line::from(vec![label, Span::raw(value)])
                }
            })
            .collect();

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            " Tab/↓ next field   BackTab/↑ previous",
            Style::default().add_modifier(Modifier::DIM),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

fn next_id(prefix: &str) -> String {
    format!("{prefix}-{}", Utc::now().timestamp_millis())
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    #[test]
    fn add_item_form_builds_a_record() {
        let mut form = FormState::add_item();
        type_into(&mut form, "user1");
        form.next_field();
        type_into(&mut form, "hunter2");
        form.next_field(); // status left blank
        form.next_field();
        type_into(&mut form, "3.50");
        form.next_field();
        type_into(&mut form, "10");
        form.next_field();
        type_into(&mut form, "400");

        let FormRecord::Item(item) = form.record().unwrap() else {
            panic!("expected an inventory record");
        };
        assert_eq!(item.account_user, "user1");
        assert_eq!(item.account_pass, "hunter2");
        assert_eq!(item.status, ItemStatus::Unsold);
        assert_eq!(item.cost, 3.5);
        assert_eq!(item.price, 10.0);
        assert_eq!(item.units, 400.0);
        assert_eq!(item.email_used, None);
        assert_eq!(item.card_used, None);
        assert!(item.id.starts_with("inv-"));
    }

    #[test]
    fn non_numeric_cost_names_the_field() {
        let mut form = FormState::add_item();
        type_into(&mut form, "user1");
        form.next_field();
        form.next_field();
        form.next_field();
        type_into(&mut form, "cheap");
        assert_eq!(form.record(), Err("cost: not a number".to_string()));
    }

    #[test]
    fn blank_account_user_is_rejected() {
        let form = FormState::add_item();
        assert_eq!(form.record(), Err("account user: required".to_string()));
    }

    #[test]
    fn hyphenated_status_parses() {
        let mut form = FormState::add_item();
        type_into(&mut form, "user1");
        form.next_field();
        form.next_field();
        type_into(&mut form, "Pending-Refund");
        let FormRecord::Item(item) = form.record().unwrap() else {
            panic!("expected an inventory record");
        };
        assert_eq!(item.status, ItemStatus::PendingRefund);
    }

    #[test]
    fn edit_email_keeps_unexposed_fields() {
        let original = EmailAccount {
            id: "acct-1".into(),
            email: "a@b.com".into(),
            usage_percent: 40.0,
            current_step: EmailStep::OtpWaiting,
            status_note: "waiting on code".into(),
            cookies: Some("session=abc".into()),
            last_fetch: Some("2024-05-01T10:00:00Z".parse().unwrap()),
        };
        let mut form = FormState::edit_email(&original);
        // Append to the note, leave everything else prefilled
        form.next_field();
        form.next_field();
        form.next_field();
        type_into(&mut form, ", retried");

        let FormRecord::EmailUpdate(updated) = form.record().unwrap() else {
            panic!("expected an email update");
        };
        assert_eq!(updated.id, "acct-1");
        assert_eq!(updated.cookies, original.cookies);
        assert_eq!(updated.last_fetch, original.last_fetch);
        assert_eq!(updated.current_step, EmailStep::OtpWaiting);
        assert_eq!(updated.status_note, "waiting on code, retried");
    }

    #[test]
    fn field_navigation_wraps_both_ways() {
        let mut form = FormState::add_card();
        form.prev_field();
        assert_eq!(form.active, 3);
        form.next_field();
        assert_eq!(form.active, 0);
    }

    #[test]
    fn backspace_edits_the_active_field() {
        let mut form = FormState::add_card();
        type_into(&mut form, "visa!");
        form.backspace();
        assert_eq!(form.fields[0].value, "visa");
        // Backspace on an empty field is a no-op
        form.next_field();
        form.backspace();
        assert_eq!(form.fields[1].value, "");
    }
}
