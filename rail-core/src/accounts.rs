use std::sync::Arc;

use tracing::error;

use crate::identity::{FederatedAssertion, IdentityError, IdentityProvider, SessionPrincipal};
use crate::profile::ProfileService;

/// Identity gateway: provider calls plus profile provisioning.
pub struct AccountService {
    provider: Arc<dyn IdentityProvider>,
    profiles: ProfileService,
}

impl AccountService {
    pub fn new(provider: Arc<dyn IdentityProvider>, profiles: ProfileService) -> Self {
        Self { provider, profiles }
    }

    pub fn provider(&self) -> Arc<dyn IdentityProvider> {
        self.provider.clone()
    }

    pub fn profiles(&self) -> &ProfileService {
        &self.profiles
    }

    /// Create the account, set its display name and provision a profile if none exists.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SessionPrincipal, IdentityError> {
        let result = async {
            let mut principal = self.provider.sign_up(email, password).await?;
            if let Some(name) = display_name.filter(|n| !n.trim().is_empty()) {
                principal = self.provider.update_display_name(&principal.uid, name).await?;
            }
            self.profiles.load_or_create(&principal).await?;
            Ok::<_, IdentityError>(principal)
        }
        .await;

        if let Err(e) = &result {
            error!("Signup error: {}", e);
        }
        result
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionPrincipal, IdentityError> {
        self.provider.sign_in(email, password).await.map_err(|e| {
            error!("Login error: {}", e);
            e
        })
    }

    /// Federated sign-in. An existing profile is left untouched.
    pub async fn sign_in_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<SessionPrincipal, IdentityError> {
        let result = async {
            let principal = self.provider.sign_in_federated(assertion).await?;
            if self.profiles.get(&principal.uid).await?.is_none() {
                self.profiles.create_initial(&principal).await?;
            }
            Ok::<_, IdentityError>(principal)
        }
        .await;

        if let Err(e) = &result {
            error!("Federated sign-in error: {}", e);
        }
        result
    }

    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        self.provider.sign_out().await.map_err(|e| {
            error!("Logout error: {}", e);
            e
        })
    }
}
