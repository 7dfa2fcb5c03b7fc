//! Test builders — ergonomic constructors for the four record types.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning
//! `Result`.

use chrono::{DateTime, Utc};
use flipdeck_core::{
    EmailAccount, EmailLog, EmailStep, InventoryItem, ItemStatus, PaymentCard,
};

// ---------------------------------------------------------------------------
// LogBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`EmailLog`] test fixtures.
///
/// # Example
///
/// ```rust
/// let log = LogBuilder::new("l1")
///     .account("e1")
///     .subject("Your code")
///     .at("2024-05-01T10:00:00Z")
///     .otp("482913")
///     .build();
/// ```
pub struct LogBuilder {
    id: String,
    created_at: DateTime<Utc>,
    subject: String,
    snippet: String,
    status: String,
    account_id: String,
    otp_code: Option<String>,
    body_html: Option<String>,
}

impl LogBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            subject: "Welcome".to_string(),
            snippet: String::new(),
            status: "unread".to_string(),
            account_id: "e1".to_string(),
            otp_code: None,
            body_html: None,
        }
    }

    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// RFC 3339 timestamp; panics on a malformed string.
    pub fn at(mut self, ts: &str) -> Self {
        self.created_at = ts.parse().expect("builder timestamp must be RFC 3339");
        self
    }

    pub fn otp(mut self, code: impl Into<String>) -> Self {
        self.otp_code = Some(code.into());
        self
    }

    pub fn body_html(mut self, html: impl Into<String>) -> Self {
        self.body_html = Some(html.into());
        self
    }

    pub fn build(self) -> EmailLog {
        EmailLog {
            id: self.id,
            created_at: self.created_at,
            subject: self.subject,
            snippet: self.snippet,
            status: self.status,
            account_id: self.account_id,
            otp_code: self.otp_code,
            body_html: self.body_html,
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Build a log with the given dedup-key triple and everything else default.
pub fn log_with_key(account: &str, subject: &str, ts: &str) -> EmailLog {
    LogBuilder::new(format!("{account}-{subject}-{ts}"))
        .account(account)
        .subject(subject)
        .at(ts)
        .build()
}

/// Build an unsold inventory item.
pub fn item(id: &str) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        account_user: format!("user-{id}"),
        account_pass: "hunter2".to_string(),
        status: ItemStatus::Unsold,
        cost: 4.5,
        price: 7.0,
        units: 800.0,
        updated_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        email_used: None,
        card_used: None,
        refund_reason: None,
    }
}

/// Build an item already sold at the given prices.
pub fn sold_item(id: &str, cost: f64, price: f64) -> InventoryItem {
    InventoryItem {
        status: ItemStatus::Sold,
        cost,
        price,
        ..item(id)
    }
}

/// Build a payment card.
pub fn card(id: &str) -> PaymentCard {
    PaymentCard {
        id: id.to_string(),
        card_name: "J. Doe".to_string(),
        card_number: "4242424242424242".to_string(),
        expiry: "12/27".to_string(),
        cvv: "123".to_string(),
    }
}

/// Build an idle email account in the `Ready` step.
pub fn account(id: &str) -> EmailAccount {
    EmailAccount {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        usage_percent: 0.0,
        current_step: EmailStep::Ready,
        status_note: "idle".to_string(),
        cookies: None,
        last_fetch: None,
    }
}
