//! # Account Commands
//!
//! A mocked session: the profile is stored locally under the `session`
//! preference. Passwords are checked for shape only and never stored.

use aali_core::account::{self, RegistrationForm};
use aali_core::UserProfile;
use aali_db::{Database, PreferenceKey};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::output::CommandOutput;

/// How the user is signing in.
#[derive(Debug, Clone)]
pub enum Credentials {
    Email { email: String, password: String },
    Social { provider: String },
}

async fn start_session(db: &Database, profile: UserProfile) -> Result<CommandOutput, ApiError> {
    db.preferences().set(PreferenceKey::Session, &profile).await?;
    info!(user_id = %profile.id, provider = %profile.provider, "Session started");
    CommandOutput::new(format!("Welcome, {}", profile.name), &profile)
}

pub async fn register(
    db: &Database,
    form: &RegistrationForm,
    now: DateTime<Utc>,
) -> Result<CommandOutput, ApiError> {
    let profile = account::register(form, Uuid::new_v4().to_string(), now)?;
    start_session(db, profile).await
}

pub async fn login(
    db: &Database,
    credentials: &Credentials,
    now: DateTime<Utc>,
) -> Result<CommandOutput, ApiError> {
    let id = Uuid::new_v4().to_string();
    let profile = match credentials {
        Credentials::Email { email, password } => account::login(email, password, id, now)?,
        Credentials::Social { provider } => account::social_login(provider, id, now)?,
    };
    start_session(db, profile).await
}

pub async fn logout(db: &Database) -> Result<CommandOutput, ApiError> {
    db.preferences().remove(PreferenceKey::Session).await?;
    Ok(CommandOutput::message("Logged out"))
}

pub async fn whoami(db: &Database) -> Result<CommandOutput, ApiError> {
    let profile: Option<UserProfile> = db.preferences().get(PreferenceKey::Session).await?;
    match profile {
        Some(p) => {
            let text = format!(
                "{} <{}> via {}, member since {}",
                p.name,
                p.email,
                p.provider,
                p.joined_at.format("%d %b %Y")
            );
            CommandOutput::new(text, &p)
        }
        None => Ok(CommandOutput {
            text: "Not logged in".to_string(),
            json: serde_json::Value::Null,
        }),
    }
}
