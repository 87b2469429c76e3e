use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::accounts::AccountService;
use crate::identity::{FederatedAssertion, SessionPrincipal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(SessionPrincipal),
}

impl SessionState {
    pub fn principal(&self) -> Option<&SessionPrincipal> {
        match self {
            SessionState::Authenticated(p) => Some(p),
            SessionState::Unauthenticated => None,
        }
    }

    fn from_provider(principal: Option<SessionPrincipal>) -> Self {
        principal.map_or(SessionState::Unauthenticated, SessionState::Authenticated)
    }
}

/// Local session state kept in step with the identity provider.
///
/// The sign-in operations report plain success or failure; the cause is logged by
/// [`AccountService`].
pub struct SessionManager {
    accounts: Arc<AccountService>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionManager {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            accounts,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Mirror every provider-pushed session change (expiry, sign-out elsewhere) into
    /// the local state. The task ends when the provider drops its channel.
    pub fn observe(&self) -> JoinHandle<()> {
        let mut provider_rx = self.accounts.provider().subscribe();
        let state = self.state.clone();
        tokio::spawn(async move {
            loop {
                let principal = provider_rx.borrow_and_update().clone();
                state.send_replace(SessionState::from_provider(principal));
                if provider_rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    pub async fn sign_up(&self, email: &str, password: &str, display_name: Option<&str>) -> bool {
        match self.accounts.sign_up(email, password, display_name).await {
            Ok(principal) => self.authenticated(principal),
            Err(_) => false,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> bool {
        match self.accounts.sign_in(email, password).await {
            Ok(principal) => self.authenticated(principal),
            Err(_) => false,
        }
    }

    pub async fn sign_in_federated(&self, assertion: &FederatedAssertion) -> bool {
        match self.accounts.sign_in_federated(assertion).await {
            Ok(principal) => self.authenticated(principal),
            Err(_) => false,
        }
    }

    pub async fn sign_out(&self) {
        if self.accounts.sign_out().await.is_ok() {
            self.state.send_replace(SessionState::Unauthenticated);
        }
    }

    fn authenticated(&self, principal: SessionPrincipal) -> bool {
        self.state.send_replace(SessionState::Authenticated(principal));
        true
    }
}
