use crate::db::users::CredentialStore;
use crate::error::VaxError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Transient marker of a successful login, scoped to one interactive user.
/// Carried in a private cookie; never stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

/// Hex-encoded SHA-256 digest of the password.
///
/// Unsalted, matching the stored behavior of the credential database this
/// replaces. Known weakness; kept rather than silently changed so existing
/// hashes stay valid.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Verifies and creates users against the credential store.
#[derive(Clone)]
pub struct Authenticator {
    store: CredentialStore,
}

impl Authenticator {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Create a new account. The confirmation gate runs before any storage
    /// work; the store's UNIQUE constraint settles duplicate names.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), VaxError> {
        if password != confirm_password {
            return Err(VaxError::PasswordMismatch);
        }
        self.store
            .create(username, &hash_password(password))
            .await?;
        Ok(())
    }

    /// Verify a username/password pair. Unknown users and wrong passwords
    /// are indistinguishable to the caller; the digest comparison is
    /// constant-time.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, VaxError> {
        let Some(user) = self.store.find_by_username(username).await? else {
            return Err(VaxError::InvalidCredentials);
        };

        let supplied = hash_password(password);
        if bool::from(supplied.as_bytes().ct_eq(user.password_hash.as_bytes())) {
            Ok(Session {
                username: user.username,
                issued_at: Utc::now(),
            })
        } else {
            Err(VaxError::InvalidCredentials)
        }
    }
}
