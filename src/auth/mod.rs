pub mod audit;
pub mod credentials;
pub mod guard;
pub mod permissions;
pub mod session;

use thiserror::Error;

use crate::cache::TokenStoreError;
use crate::client::ClientError;

pub use audit::AuditLogger;
pub use credentials::{BcryptCredentials, CredentialVerifier, DemoCredentials};
pub use guard::{GuardDecision, check_route};
pub use permissions::PermissionSet;
pub use session::{AuthSession, AuthStatus, LoginOutcome};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, inactive user, or wrong password. Deliberately not
    /// distinguished.
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("credential check: {0}")]
    Credential(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}
