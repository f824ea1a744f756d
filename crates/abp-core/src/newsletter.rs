//! Newsletter subscribers (double opt-in).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::id::SubscriberId;
use crate::lifecycle::SubscriberState;

/// Newsletter subscriber walking the double-opt-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: SubscriberId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub state: SubscriberState,
    /// Opaque token mailed out with the confirmation link; cleared on
    /// confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl NewsletterSubscriber {
    /// Cross-field invariant: the confirmed state requires `confirmed_at`.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !self.email.contains('@') {
            errors.add("email", "invalid", "is not an email address");
        }
        if self.state == SubscriberState::Confirmed && self.confirmed_at.is_none() {
            errors.add("confirmed_at", "blank", "must be present for confirmed subscribers");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_state_requires_timestamp() {
        let subscriber = NewsletterSubscriber {
            id: SubscriberId::generate(),
            email: "reader@example.org".to_string(),
            first_name: None,
            last_name: None,
            state: SubscriberState::Confirmed,
            confirmation_token: None,
            confirmation_sent_at: None,
            confirmed_at: None,
        };
        assert_eq!(subscriber.validate().errors()[0].field, "confirmed_at");
    }
}
