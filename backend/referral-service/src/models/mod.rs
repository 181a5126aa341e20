use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub code: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub messaging_id: Option<String>,
    pub referred_by_user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferralEdge {
    pub id: i64,
    pub referrer_user_id: i64,
    pub referred_user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReservedAccount {
    pub id: i64,
    pub username: String,
    pub currency: Option<String>,
    pub is_assigned: bool,
    pub assigned_user_id: Option<i64>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlacklistEntry {
    pub id: i64,
    pub kind: String,
    pub value: String,
    pub reason: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Attribute category a banned value applies to. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistKind {
    Phone,
    Name,
    MessagingId,
    ReferralCode,
    ReferralUsername,
}

impl BlacklistKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlacklistKind::Phone => "phone",
            BlacklistKind::Name => "name",
            BlacklistKind::MessagingId => "messaging_id",
            BlacklistKind::ReferralCode => "referral_code",
            BlacklistKind::ReferralUsername => "referral_username",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "phone" => Some(BlacklistKind::Phone),
            "name" => Some(BlacklistKind::Name),
            "messaging_id" => Some(BlacklistKind::MessagingId),
            "referral_code" => Some(BlacklistKind::ReferralCode),
            "referral_username" => Some(BlacklistKind::ReferralUsername),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlacklistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intake attributes for one signup attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupIntake {
    /// Explicit username. When present the pool is bypassed.
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub messaging_id: Option<String>,
    pub referral_code: Option<String>,
    pub referral_username: Option<String>,
    /// Allocate a reserved username from the pool when no explicit username is given.
    #[serde(default = "default_auto_assign")]
    pub auto_assign: bool,
    pub preferred_currency: Option<String>,
}

impl Default for SignupIntake {
    fn default() -> Self {
        SignupIntake {
            username: None,
            first_name: None,
            last_name: None,
            phone: None,
            messaging_id: None,
            referral_code: None,
            referral_username: None,
            auto_assign: default_auto_assign(),
            preferred_currency: None,
        }
    }
}

fn default_auto_assign() -> bool {
    true
}

/// Profile fields mutable after creation. Referrer and code are not among them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub messaging_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub code: String,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        UserSummary {
            id: u.id,
            username: u.username.clone(),
            code: u.code.clone(),
        }
    }
}

/// Full user view returned by lookups: the user plus referral context.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub code: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub messaging_id: Option<String>,
    pub referred_by: Option<UserSummary>,
    pub referrals: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful signup.
#[derive(Debug, Serialize)]
pub struct SignupOutcome {
    pub user: User,
    pub referred_by: Option<UserSummary>,
    /// True when the username came from the reserved-account pool.
    pub pool_assigned: bool,
}

/// Result of a bulk user import.
#[derive(Debug, Default, Serialize)]
pub struct BulkOutcome {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacklist_kind_round_trips() {
        for kind in [
            BlacklistKind::Phone,
            BlacklistKind::Name,
            BlacklistKind::MessagingId,
            BlacklistKind::ReferralCode,
            BlacklistKind::ReferralUsername,
        ] {
            assert_eq!(BlacklistKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(BlacklistKind::parse("email"), None);
    }

    #[test]
    fn intake_defaults_to_auto_assign() {
        let intake: SignupIntake = serde_json::from_str("{}").unwrap();
        assert!(intake.auto_assign);
        assert!(intake.username.is_none());
    }
}
