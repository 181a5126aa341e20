/// Blacklist screening of signup intake attributes
use crate::db::blacklist_repo;
use crate::error::Result;
use crate::models::{BlacklistKind, SignupIntake};
use sqlx::PgPool;

/// Normalize a free-text attribute for comparison: trim, collapse internal
/// whitespace, lowercase. Empty input normalizes to None.
pub fn normalize(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.to_lowercase())
    }
}

fn normalize_opt(value: Option<&str>) -> Option<String> {
    value.and_then(normalize)
}

/// Check intake attributes against active blacklist entries.
///
/// Returns the first match's reason, or a generic message naming the kind
/// when no reason text is stored. Check order is phone, messaging id,
/// referral code, referral username, then the concatenated name: values
/// that are harder to forge take priority when reporting the block reason.
/// Absent attributes skip their check silently.
pub async fn screen(pool: &PgPool, intake: &SignupIntake) -> Result<Option<String>> {
    let name = match (intake.first_name.as_deref(), intake.last_name.as_deref()) {
        (None, None) => None,
        (first, last) => normalize(&format!(
            "{} {}",
            first.unwrap_or_default(),
            last.unwrap_or_default()
        )),
    };

    let checks = [
        (BlacklistKind::Phone, normalize_opt(intake.phone.as_deref())),
        (
            BlacklistKind::MessagingId,
            normalize_opt(intake.messaging_id.as_deref()),
        ),
        (
            BlacklistKind::ReferralCode,
            normalize_opt(intake.referral_code.as_deref()),
        ),
        (
            BlacklistKind::ReferralUsername,
            normalize_opt(intake.referral_username.as_deref()),
        ),
        (BlacklistKind::Name, name),
    ];

    for (kind, value) in checks {
        let Some(value) = value else {
            continue;
        };
        if let Some(reason) = blacklist_repo::find_active_reason(pool, kind, &value).await? {
            let reason = reason.unwrap_or_else(|| format!("blocked by blacklist: {}", kind));
            tracing::info!(kind = %kind, "signup blocked by blacklist");
            return Ok(Some(reason));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_collapses_and_lowercases() {
        assert_eq!(normalize("  Alice   SMITH "), Some("alice smith".into()));
        assert_eq!(normalize("+1 000 000\t0000"), Some("+1 000 000 0000".into()));
        assert_eq!(normalize("Already clean"), Some("already clean".into()));
    }

    #[test]
    fn normalize_empties_to_none() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("\t\n"), None);
    }

    #[test]
    fn normalize_opt_skips_absent_values() {
        assert_eq!(normalize_opt(None), None);
        assert_eq!(normalize_opt(Some("  ")), None);
        assert_eq!(normalize_opt(Some(" X ")), Some("x".into()));
    }
}
