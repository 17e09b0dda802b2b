//! Maps external identity-provider subjects to local user records.

use std::sync::Arc;

use db::{DBService, models::user::User};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("owner id cannot be blank")]
    BlankOwnerId,
}

/// Fallback display name when the provider sends nothing usable.
const UNKNOWN_NAME: &str = "Unknown";

#[derive(Clone)]
pub struct IdentityService {
    db: DBService,
    admin_owner_ids: Arc<Vec<String>>,
}

impl IdentityService {
    pub fn new(db: DBService, admin_owner_ids: Vec<String>) -> Self {
        Self {
            db,
            admin_owner_ids: Arc::new(admin_owner_ids),
        }
    }

    /// Resolve the local user for an external subject, creating the
    /// record on first interaction. Idempotent.
    ///
    /// Owner ids configured as admins are promoted here, so the flag is
    /// applied both to fresh records and to users created before the
    /// configuration changed.
    pub async fn ensure_user(
        &self,
        owner_id: &str,
        display_name: Option<&str>,
    ) -> Result<User, IdentityError> {
        if owner_id.trim().is_empty() {
            warn!("no owner id found; user details will not be saved");
            return Err(IdentityError::BlankOwnerId);
        }

        let should_be_admin = self.admin_owner_ids.iter().any(|id| id == owner_id);

        if let Some(existing) = User::find_by_owner_id(&self.db.pool, owner_id).await? {
            if should_be_admin && !existing.is_admin {
                let promoted = User::set_admin(&self.db.pool, owner_id, true)
                    .await?
                    .unwrap_or(existing);
                info!(owner_id, "user promoted to admin");
                return Ok(promoted);
            }
            return Ok(existing);
        }

        let name = normalize_display_name(display_name);
        let user = User::create(&self.db.pool, owner_id, Some(&name)).await?;
        info!(user = %name, "user was saved");

        if should_be_admin {
            let promoted = User::set_admin(&self.db.pool, owner_id, true)
                .await?
                .unwrap_or(user);
            return Ok(promoted);
        }

        Ok(user)
    }

    /// Unknown users are never admins.
    pub async fn is_admin(&self, owner_id: &str) -> Result<bool, IdentityError> {
        Ok(User::is_admin(&self.db.pool, owner_id).await?)
    }

    /// Map an owner id to the internal numeric user id, if the user exists.
    pub async fn resolve_user_id(&self, owner_id: &str) -> Result<Option<i64>, IdentityError> {
        let user = User::find_by_owner_id(&self.db.pool, owner_id).await?;
        Ok(user.map(|u| u.id))
    }
}

/// Blank or single-character names are replaced with a placeholder,
/// matching how the identity provider's claims were handled upstream.
fn normalize_display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(trimmed) if trimmed.chars().count() >= 2 => trimmed.to_string(),
        _ => UNKNOWN_NAME.to_string(),
    }
}
