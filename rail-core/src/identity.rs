use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// The signed-in account as seen by the rest of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPrincipal {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}

/// Identity asserted by a federated provider after its popup flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedAssertion {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already in use: {0}")]
    EmailInUse(String),

    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),

    #[error("Account not found: {0}")]
    UnknownAccount(String),

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Profile provisioning failed: {0}")]
    Provisioning(#[from] crate::profile::ProfileError),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SessionPrincipal, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionPrincipal, IdentityError>;

    /// Complete a federated sign-in, creating the account on first use.
    async fn sign_in_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<SessionPrincipal, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    async fn update_display_name(
        &self,
        uid: &str,
        display_name: &str,
    ) -> Result<SessionPrincipal, IdentityError>;

    /// Current session, re-published on every provider-side change.
    fn subscribe(&self) -> watch::Receiver<Option<SessionPrincipal>>;
}

struct Account {
    principal: SessionPrincipal,
    password_hash: Option<String>,
    federated_subject: Option<(String, String)>,
}

/// In-process identity provider. Accounts are keyed by lower-cased email.
pub struct LocalIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: watch::Sender<Option<SessionPrincipal>>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session,
        }
    }

    /// Drop the current session as the provider would on token expiry.
    pub fn expire_session(&self) {
        self.session.send_replace(None);
    }

    fn publish(&self, principal: &SessionPrincipal) {
        self.session.send_replace(Some(principal.clone()));
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Provider(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
    let parsed = PasswordHash::new(hash).map_err(|e| IdentityError::Provider(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(IdentityError::Provider(e.to_string())),
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SessionPrincipal, IdentityError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword(MIN_PASSWORD_LENGTH));
        }
        let key = email.trim().to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(IdentityError::EmailInUse(key));
        }

        let principal = SessionPrincipal {
            uid: Uuid::new_v4().to_string(),
            email: key.clone(),
            display_name: String::new(),
        };
        accounts.insert(
            key,
            Account {
                principal: principal.clone(),
                password_hash: Some(hash_password(password)?),
                federated_subject: None,
            },
        );
        drop(accounts);

        tracing::info!("Account created: {}", principal.uid);
        self.publish(&principal);
        Ok(principal)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionPrincipal, IdentityError> {
        let key = email.trim().to_lowercase();
        let accounts = self.accounts.read().await;
        let account = accounts.get(&key).ok_or(IdentityError::InvalidCredentials)?;
        let hash = account
            .password_hash
            .as_deref()
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password(password, hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        let principal = account.principal.clone();
        drop(accounts);
        self.publish(&principal);
        Ok(principal)
    }

    async fn sign_in_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<SessionPrincipal, IdentityError> {
        // A real provider verifies the assertion signature; this one trusts the popup result.
        let key = assertion.email.trim().to_lowercase();
        let mut accounts = self.accounts.write().await;
        let account = accounts.entry(key.clone()).or_insert_with(|| Account {
            principal: SessionPrincipal {
                uid: Uuid::new_v4().to_string(),
                email: key.clone(),
                display_name: assertion.display_name.clone().unwrap_or_default(),
            },
            password_hash: None,
            federated_subject: None,
        });
        account.federated_subject = Some((assertion.provider.clone(), assertion.subject.clone()));

        let principal = account.principal.clone();
        drop(accounts);

        tracing::info!("Federated sign-in via {}: {}", assertion.provider, principal.uid);
        self.publish(&principal);
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.session.send_replace(None);
        Ok(())
    }

    async fn update_display_name(
        &self,
        uid: &str,
        display_name: &str,
    ) -> Result<SessionPrincipal, IdentityError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|a| a.principal.uid == uid)
            .ok_or_else(|| IdentityError::UnknownAccount(uid.to_string()))?;
        account.principal.display_name = display_name.to_string();

        let principal = account.principal.clone();
        drop(accounts);

        let is_current = self
            .session
            .borrow()
            .as_ref()
            .is_some_and(|current| current.uid == principal.uid);
        if is_current {
            self.publish(&principal);
        }
        Ok(principal)
    }

    fn subscribe(&self) -> watch::Receiver<Option<SessionPrincipal>> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let provider = LocalIdentityProvider::new();
        let created = provider.sign_up("Asha@Example.com", "secret-pass").await.unwrap();
        assert_eq!(created.email, "asha@example.com");

        let signed_in = provider.sign_in("asha@example.com", "secret-pass").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let provider = LocalIdentityProvider::new();
        provider.sign_up("asha@example.com", "secret-pass").await.unwrap();
        let result = provider.sign_in("asha@example.com", "nope-nope").await;
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_duplicate_and_weak_sign_up() {
        let provider = LocalIdentityProvider::new();
        provider.sign_up("asha@example.com", "secret-pass").await.unwrap();
        assert!(matches!(
            provider.sign_up("asha@example.com", "another-pass").await,
            Err(IdentityError::EmailInUse(_))
        ));
        assert!(matches!(
            provider.sign_up("ravi@example.com", "123").await,
            Err(IdentityError::WeakPassword(6))
        ));
    }

    #[tokio::test]
    async fn test_federated_sign_in_reuses_account() {
        let provider = LocalIdentityProvider::new();
        let assertion = FederatedAssertion {
            provider: "google".to_string(),
            subject: "g-123".to_string(),
            email: "meera@example.com".to_string(),
            display_name: Some("Meera".to_string()),
        };
        let first = provider.sign_in_federated(&assertion).await.unwrap();
        let second = provider.sign_in_federated(&assertion).await.unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(first.display_name, "Meera");
    }

    #[tokio::test]
    async fn test_session_channel_follows_sign_in_and_expiry() {
        let provider = LocalIdentityProvider::new();
        let rx = provider.subscribe();
        assert!(rx.borrow().is_none());

        let principal = provider.sign_up("asha@example.com", "secret-pass").await.unwrap();
        assert_eq!(rx.borrow().as_ref(), Some(&principal));

        provider.expire_session();
        assert!(rx.borrow().is_none());
    }
}
