//! # Mocked Account Flows
//!
//! Registration, login and social login all succeed locally once the input
//! passes validation. No credential is checked against anything and no
//! password ever leaves these functions.

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, ValidationErrors};
use crate::validation::{validate_email, validate_registration, validate_required};
use crate::types::UserProfile;

/// Registration form as entered.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validates a registration and returns the new session profile.
pub fn register(
    form: &RegistrationForm,
    id: String,
    now: DateTime<Utc>,
) -> Result<UserProfile, ValidationErrors> {
    validate_registration(
        &form.name,
        &form.email,
        &form.phone,
        &form.password,
        &form.confirm_password,
    )?;

    Ok(UserProfile {
        id,
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: Some(form.phone.trim().to_string()),
        joined_at: now,
        provider: "email".to_string(),
    })
}

/// Mock email login: any well-formed email with a non-empty password.
///
/// The display name is taken from the email's local part.
pub fn login(
    email: &str,
    password: &str,
    id: String,
    now: DateTime<Utc>,
) -> Result<UserProfile, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    match validate_required("Email", email) {
        Ok(()) => errors.check(validate_email(email)),
        Err(e) => errors.push(e),
    }
    errors.check(validate_required("Password", password));
    errors.into_result()?;

    let email = email.trim();
    let local = email.split('@').next().unwrap_or(email);
    Ok(UserProfile {
        id,
        name: display_name(local),
        email: email.to_string(),
        phone: None,
        joined_at: now,
        provider: "email".to_string(),
    })
}

/// Mock social login for `google` or `facebook`.
pub fn social_login(
    provider: &str,
    id: String,
    now: DateTime<Utc>,
) -> Result<UserProfile, ValidationError> {
    let provider = provider.trim().to_lowercase();
    let name = match provider.as_str() {
        "google" => "Google User",
        "facebook" => "Facebook User",
        _ => {
            return Err(ValidationError::NotAllowed {
                field: "provider".to_string(),
                allowed: vec!["google".to_string(), "facebook".to_string()],
            })
        }
    };

    Ok(UserProfile {
        id,
        name: name.to_string(),
        email: format!("{}.user@example.com", provider),
        phone: None,
        joined_at: now,
        provider,
    })
}

/// `asha.verma_92` → `Asha Verma 92`.
fn display_name(local: &str) -> String {
    local
        .split(|c: char| c == '.' || c == '_' || c == '-' || c == '+')
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
