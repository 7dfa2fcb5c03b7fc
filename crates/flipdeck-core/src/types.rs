//! Core types for flipdeck.
//!
//! This module defines the four record types held by the persisted store —
//! [`InventoryItem`], [`PaymentCard`], [`EmailAccount`], [`EmailLog`] — plus
//! the closed tag enums [`ItemStatus`] and [`EmailStep`] and the persisted
//! [`AppState`] shape.
//!
//! Records are immutable by convention: mutation always means replacing the
//! whole record in its collection through the store's mutation API, never
//! editing fields of a record already in a collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sale status of an inventory item.
///
/// Wire names keep the hyphenated forms used by existing snapshots
/// (`"Pending-Refund"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Sold,
    Unsold,
    Refunded,
    #[serde(rename = "Pending-Refund")]
    PendingRefund,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Sold => write!(f, "Sold"),
            ItemStatus::Unsold => write!(f, "Unsold"),
            ItemStatus::Refunded => write!(f, "Refunded"),
            ItemStatus::PendingRefund => write!(f, "Pending-Refund"),
        }
    }
}

/// A tag string that matches no variant of the enum being parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag: {0:?}")]
pub struct UnknownTag(pub String);

impl std::str::FromStr for ItemStatus {
    type Err = UnknownTag;

    /// Parses the wire names, hyphenated forms included.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sold" => Ok(ItemStatus::Sold),
            "Unsold" => Ok(ItemStatus::Unsold),
            "Refunded" => Ok(ItemStatus::Refunded),
            "Pending-Refund" => Ok(ItemStatus::PendingRefund),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

/// Progress tag for an email account working through the external purchase
/// automation flow.
///
/// Transitions are asserted by whoever drives the flow (UI or an external
/// agent); the store records whichever value is written and validates
/// nothing. Wire names keep the hyphenated forms (`"Login-Pending"`,
/// `"OTP-Waiting"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailStep {
    Ready,
    #[serde(rename = "Login-Pending")]
    LoginPending,
    #[serde(rename = "OTP-Waiting")]
    OtpWaiting,
    Purchasing,
    Success,
    Returning,
    Returned,
}

impl std::fmt::Display for EmailStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailStep::Ready => write!(f, "Ready"),
            EmailStep::LoginPending => write!(f, "Login-Pending"),
            EmailStep::OtpWaiting => write!(f, "OTP-Waiting"),
            EmailStep::Purchasing => write!(f, "Purchasing"),
            EmailStep::Success => write!(f, "Success"),
            EmailStep::Returning => write!(f, "Returning"),
            EmailStep::Returned => write!(f, "Returned"),
        }
    }
}

impl std::str::FromStr for EmailStep {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ready" => Ok(EmailStep::Ready),
            "Login-Pending" => Ok(EmailStep::LoginPending),
            "OTP-Waiting" => Ok(EmailStep::OtpWaiting),
            "Purchasing" => Ok(EmailStep::Purchasing),
            "Success" => Ok(EmailStep::Success),
            "Returning" => Ok(EmailStep::Returning),
            "Returned" => Ok(EmailStep::Returned),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

/// One resold unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique within the inventory collection.
    pub id: String,
    /// Login name of the account the unit lives on.
    pub account_user: String,
    /// Password of that account.
    pub account_pass: String,
    pub status: ItemStatus,
    /// What the unit cost to acquire.
    pub cost: f64,
    /// What it sold (or is listed) for.
    pub price: f64,
    /// Quantity of units on the account.
    pub units: f64,
    pub updated_at: DateTime<Utc>,
    /// Id of the [`EmailAccount`] used for the sale, when one was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_used: Option<String>,
    /// Id of the [`PaymentCard`] used for the sale, when one was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
}

/// One payment card. No lifecycle beyond add/delete by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCard {
    /// Unique within the payments collection.
    pub id: String,
    pub card_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// One email account used by the automated purchase flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAccount {
    /// Unique within the emails collection.
    pub id: String,
    pub email: String,
    pub usage_percent: f64,
    pub current_step: EmailStep,
    /// Free-text status line shown next to the step tag.
    pub status_note: String,
    /// Session cookie blob. `None` means the account was never fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fetch: Option<DateTime<Utc>>,
}

/// One message pulled from an email account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailLog {
    /// Unique by convention, but deliberately NOT part of the dedup key —
    /// see [`EmailLog::dedup_key`].
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub subject: String,
    pub snippet: String,
    pub status: String,
    /// Id of the owning [`EmailAccount`].
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
}

/// Identity of a log for merge purposes: `(account_id, subject, created_at)`.
///
/// The log's own `id` is not included, so two genuinely distinct events that
/// share all three fields (a retried fetch, say) collapse into one — the
/// first write wins and later bodies/OTP codes are dropped. That matches the
/// behavior flipdeck has always had; do not widen the key without a product
/// decision.
pub type LogKey = (String, String, DateTime<Utc>);

impl EmailLog {
    /// The merge identity of this log. See [`LogKey`].
    pub fn dedup_key(&self) -> LogKey {
        (self.account_id.clone(), self.subject.clone(), self.created_at)
    }
}

/// The whole persisted state: four independently ordered collections.
///
/// User-added collections are newest-first by convention (adds prepend);
/// logs are re-sorted newest-first on every merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub inventory: Vec<InventoryItem>,
    pub payments: Vec<PaymentCard>,
    pub emails: Vec<EmailAccount>,
    pub logs: Vec<EmailLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_are_hyphenated() {
        assert_eq!(
            serde_json::to_string(&ItemStatus::PendingRefund).unwrap(),
            "\"Pending-Refund\""
        );
        assert_eq!(serde_json::to_string(&ItemStatus::Sold).unwrap(), "\"Sold\"");
        assert_eq!(
            serde_json::from_str::<ItemStatus>("\"Pending-Refund\"").unwrap(),
            ItemStatus::PendingRefund
        );
    }

    #[test]
    fn step_wire_names_are_hyphenated() {
        assert_eq!(
            serde_json::to_string(&EmailStep::OtpWaiting).unwrap(),
            "\"OTP-Waiting\""
        );
        assert_eq!(
            serde_json::from_str::<EmailStep>("\"Login-Pending\"").unwrap(),
            EmailStep::LoginPending
        );
    }

    #[test]
    fn tags_parse_back_from_their_display_form() {
        assert_eq!("Pending-Refund".parse(), Ok(ItemStatus::PendingRefund));
        assert_eq!("Unsold".parse(), Ok(ItemStatus::Unsold));
        assert_eq!("OTP-Waiting".parse(), Ok(EmailStep::OtpWaiting));
        assert_eq!("Ready".parse(), Ok(EmailStep::Ready));
        // Variant names without the hyphenation are not wire names
        assert_eq!(
            "PendingRefund".parse::<ItemStatus>(),
            Err(UnknownTag("PendingRefund".into()))
        );
        assert_eq!(
            "otp-waiting".parse::<EmailStep>(),
            Err(UnknownTag("otp-waiting".into()))
        );
    }

    #[test]
    fn absent_optional_fields_deserialize_as_none() {
        let log: EmailLog = serde_json::from_str(
            r#"{
                "id": "l1",
                "created_at": "2024-05-01T10:00:00Z",
                "subject": "Welcome",
                "snippet": "",
                "status": "read",
                "account_id": "e1"
            }"#,
        )
        .unwrap();
        assert_eq!(log.otp_code, None);
        assert_eq!(log.body_html, None);
    }

    #[test]
    fn dedup_key_ignores_id_and_snippet() {
        let base = EmailLog {
            id: "l1".into(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
            subject: "Welcome".into(),
            snippet: "hello".into(),
            status: "read".into(),
            account_id: "e1".into(),
            otp_code: None,
            body_html: None,
        };
        let other = EmailLog {
            id: "l2".into(),
            snippet: "different".into(),
            otp_code: Some("123456".into()),
            ..base.clone()
        };
        assert_eq!(base.dedup_key(), other.dedup_key());
    }
}
