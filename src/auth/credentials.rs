use std::collections::HashMap;

use super::AuthError;
use crate::models::UserRecord;
use crate::utils::verify_password;

/// Password check run by `AuthSession::login` once the active user is found.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, user: &UserRecord, password: &str) -> Result<bool, AuthError>;
}

/// Fixed demo table keyed by lower-cased email, compared by plain equality.
///
/// Users without an entry are accepted with any password, which is how the
/// demo tenant lets administrator-created accounts sign in. Not for
/// production; use [`BcryptCredentials`] there.
pub struct DemoCredentials {
    table: HashMap<String, String>,
}

pub const DEMO_CREDENTIALS: &[(&str, &str)] = &[
    ("admin@company.com", "admin123"),
    ("leadgen@company.com", "leadgen123"),
    ("presales@company.com", "presales123"),
    ("sales@company.com", "sales123"),
    ("implementation@company.com", "impl123"),
    ("finance@company.com", "finance123"),
    ("data@company.com", "data123"),
];

impl DemoCredentials {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            table: pairs
                .into_iter()
                .map(|(email, password)| (email.to_lowercase(), password.to_string()))
                .collect(),
        }
    }
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self::from_pairs(DEMO_CREDENTIALS.iter().copied())
    }
}

impl CredentialVerifier for DemoCredentials {
    fn verify(&self, user: &UserRecord, password: &str) -> Result<bool, AuthError> {
        match self.table.get(&user.email.to_lowercase()) {
            Some(expected) => Ok(expected == password),
            None => {
                tracing::warn!(
                    "no demo credential for {}, accepting without a password check",
                    user.email
                );
                Ok(true)
            }
        }
    }
}

/// bcrypt comparison against `users.passwordHash`. A user without a hash
/// cannot log in.
#[derive(Debug, Default, Clone, Copy)]
pub struct BcryptCredentials;

impl CredentialVerifier for BcryptCredentials {
    fn verify(&self, user: &UserRecord, password: &str) -> Result<bool, AuthError> {
        match &user.password_hash {
            Some(hash) => {
                verify_password(password, hash).map_err(|e| AuthError::Credential(e.to_string()))
            }
            None => Ok(false),
        }
    }
}
