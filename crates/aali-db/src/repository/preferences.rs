//! # Preferences Repository
//!
//! Small JSON values keyed by [`PreferenceKey`]: recent searches, the
//! checkout draft and the signed-in session profile.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Known preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    /// `Vec<String>`, most recent first.
    RecentSearches,
    /// `CheckoutForm` without the card number.
    CheckoutDraft,
    /// `UserProfile` of the signed-in user.
    Session,
}

impl PreferenceKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::RecentSearches => "recent_searches",
            PreferenceKey::CheckoutDraft => "checkout_draft",
            PreferenceKey::Session => "session",
        }
    }
}

/// Repository for preferences.
#[derive(Debug, Clone)]
pub struct PreferenceRepository {
    pool: SqlitePool,
}

impl PreferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PreferenceRepository { pool }
    }

    /// Reads and decodes a value, `None` when unset.
    pub async fn get<T: DeserializeOwned>(&self, key: PreferenceKey) -> DbResult<Option<T>> {
        debug!(key = key.as_str(), "Reading preference");

        let raw: Option<String> =
            sqlx::query_scalar("SELECT value_json FROM preferences WHERE key = ?1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Stores a value, replacing any previous one.
    pub async fn set<T: Serialize + ?Sized>(&self, key: PreferenceKey, value: &T) -> DbResult<()> {
        debug!(key = key.as_str(), "Writing preference");

        sqlx::query(
            r#"
            INSERT INTO preferences (key, value_json, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(serde_json::to_string(value)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Deletes a value. Deleting an unset key is not an error.
    pub async fn remove(&self, key: PreferenceKey) -> DbResult<()> {
        debug!(key = key.as_str(), "Removing preference");

        sqlx::query("DELETE FROM preferences WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use aali_core::CheckoutForm;

    async fn repo() -> PreferenceRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .preferences()
    }

    #[tokio::test]
    async fn test_unset_key_is_none() {
        let value: Option<Vec<String>> = repo().await.get(PreferenceKey::RecentSearches).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let repo = repo().await;
        repo.set(PreferenceKey::RecentSearches, &vec!["ring".to_string()])
            .await
            .unwrap();
        repo.set(
            PreferenceKey::RecentSearches,
            &vec!["bangle".to_string(), "ring".to_string()],
        )
        .await
        .unwrap();

        let value: Vec<String> = repo
            .get(PreferenceKey::RecentSearches)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value, vec!["bangle", "ring"]);
    }

    #[tokio::test]
    async fn test_checkout_draft_round_trip_and_remove() {
        let repo = repo().await;
        let draft = CheckoutForm {
            name: "Asha Verma".to_string(),
            pincode: "302001".to_string(),
            ..CheckoutForm::default()
        };
        repo.set(PreferenceKey::CheckoutDraft, &draft).await.unwrap();

        let loaded: CheckoutForm = repo
            .get(PreferenceKey::CheckoutDraft)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, draft);

        repo.remove(PreferenceKey::CheckoutDraft).await.unwrap();
        repo.remove(PreferenceKey::CheckoutDraft).await.unwrap();
        let gone: Option<CheckoutForm> = repo.get(PreferenceKey::CheckoutDraft).await.unwrap();
        assert!(gone.is_none());
    }
}
