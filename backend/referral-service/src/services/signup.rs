/// Signup orchestration: screening, referrer resolution, pool allocation,
/// code assignment, persistence and ledger update as one atomic unit.
use crate::config::SignupConfig;
use crate::db::{pool_repo, referral_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{BulkOutcome, SignupIntake, SignupOutcome, User, UserSummary};
use crate::services::{codes, screening};
use crate::validators::validate_username;
use sqlx::PgPool;

#[derive(Clone)]
pub struct SignupService {
    pool: PgPool,
    code_length: usize,
    code_max_attempts: u32,
}

impl SignupService {
    pub fn new(pool: PgPool, config: &SignupConfig) -> Self {
        Self {
            pool,
            code_length: config.code_length,
            code_max_attempts: config.code_max_attempts,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run one signup attempt end to end.
    ///
    /// Everything from the pool claim onward happens in a single
    /// transaction: a failure at any later step rolls back the claimed
    /// reserved account and the inserted user row, so no orphan state
    /// survives a failed attempt.
    pub async fn submit_signup(&self, intake: SignupIntake) -> Result<SignupOutcome> {
        if let Some(reason) = screening::screen(&self.pool, &intake).await? {
            return Err(AppError::Blacklisted(reason));
        }

        // Best-effort: an invalid referral never blocks signup.
        let referrer = self
            .resolve_referrer(
                intake.referral_code.as_deref(),
                intake.referral_username.as_deref(),
            )
            .await?;

        let explicit_username = match intake.username.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(username) => {
                if !validate_username(username) {
                    return Err(AppError::Validation(format!(
                        "invalid username: {}",
                        username
                    )));
                }
                Some(username.to_string())
            }
        };
        if explicit_username.is_none() && !intake.auto_assign {
            return Err(AppError::Validation(
                "username is required when auto-assignment is disabled".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Pool exhaustion is only fatal when the pool was actually consulted.
        let (username, claimed_account) = match explicit_username {
            Some(username) => (username, None),
            None => {
                let account = pool_repo::claim_next_unassigned(
                    &mut *tx,
                    intake.preferred_currency.as_deref(),
                )
                .await?
                .ok_or(AppError::PoolExhausted)?;
                (account.username.clone(), Some(account))
            }
        };

        let mut attempts = 0u32;
        let user = loop {
            attempts += 1;
            let code = codes::generate_code(self.code_length);
            let inserted = user_repo::create_user(
                &mut *tx,
                user_repo::NewUser {
                    username: &username,
                    code: &code,
                    first_name: intake.first_name.as_deref(),
                    last_name: intake.last_name.as_deref(),
                    phone: intake.phone.as_deref(),
                    messaging_id: intake.messaging_id.as_deref(),
                    referred_by_user_id: referrer.as_ref().map(|r| r.id),
                },
            )
            .await
            .map_err(|err| map_username_conflict(err, &username))?;

            match inserted {
                Some(user) => break user,
                None if attempts < self.code_max_attempts => {
                    tracing::warn!(attempts, "referral code collision, regenerating");
                }
                None => {
                    tracing::error!(
                        attempts,
                        "giving up on code generation after repeated collisions"
                    );
                    return Err(AppError::CodeAllocationExhausted);
                }
            }
        };

        if let Some(account) = &claimed_account {
            let marked = pool_repo::mark_assigned(&mut *tx, account.id, user.id).await?;
            if !marked {
                // The claim holds a row lock, so this cannot race; anything
                // else reaching here is a broken invariant.
                return Err(AppError::Internal(format!(
                    "reserved account {} vanished between claim and assignment",
                    account.username
                )));
            }
        }

        if let Some(referrer) = &referrer {
            if referrer.id != user.id {
                referral_repo::record(&mut *tx, referrer.id, user.id).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            user_id = user.id,
            username = %user.username,
            pool_assigned = claimed_account.is_some(),
            referred = referrer.is_some(),
            "signup complete"
        );

        Ok(SignupOutcome {
            referred_by: referrer.as_ref().map(UserSummary::from),
            pool_assigned: claimed_account.is_some(),
            user,
        })
    }

    /// Map a supplied code or username to the referring user.
    ///
    /// Code lookup takes precedence; the username is consulted only when no
    /// code was supplied or the code did not resolve. Non-matching input
    /// yields no referrer, never an error.
    pub async fn resolve_referrer(
        &self,
        code: Option<&str>,
        username: Option<&str>,
    ) -> Result<Option<User>> {
        if let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) {
            if let Some(user) = user_repo::find_by_code(&self.pool, code).await? {
                return Ok(Some(user));
            }
        }
        if let Some(username) = username.map(str::trim).filter(|u| !u.is_empty()) {
            if let Some(user) = user_repo::find_by_username(&self.pool, username).await? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// Import a batch of usernames, minting a code for each.
    ///
    /// Entries are independent: a username collision (including duplicates
    /// within the batch) skips that entry without aborting the rest, and a
    /// per-entry code collision is retried with a fresh code.
    pub async fn bulk_create(&self, usernames: Vec<String>) -> Result<BulkOutcome> {
        let mut outcome = BulkOutcome::default();

        for raw in usernames {
            let username = raw.trim();
            if username.is_empty() {
                continue;
            }
            if !validate_username(username) {
                outcome.skipped.push(username.to_string());
                continue;
            }

            let mut attempts = 0u32;
            loop {
                attempts += 1;
                let code = codes::generate_code(self.code_length);
                match user_repo::insert_ignore_username_conflict(&self.pool, username, &code).await
                {
                    Ok(Some(_)) => {
                        outcome.added.push(username.to_string());
                        break;
                    }
                    Ok(None) => {
                        outcome.skipped.push(username.to_string());
                        break;
                    }
                    Err(err) if is_code_conflict(&err) && attempts < self.code_max_attempts => {
                        tracing::warn!(attempts, username, "bulk code collision, regenerating");
                    }
                    Err(err) if is_code_conflict(&err) => {
                        tracing::error!(username, "bulk entry dropped: code space exhausted");
                        outcome.skipped.push(username.to_string());
                        break;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        Ok(outcome)
    }
}

fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) => db.constraint(),
        _ => None,
    }
}

fn map_username_conflict(err: sqlx::Error, username: &str) -> AppError {
    if violated_constraint(&err) == Some("users_username_key") {
        AppError::DuplicateUsername(username.to_string())
    } else {
        AppError::Database(err)
    }
}

fn is_code_conflict(err: &sqlx::Error) -> bool {
    violated_constraint(err) == Some("users_code_key")
}
