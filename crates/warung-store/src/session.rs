//! # Session
//!
//! Holds the logged-in user and keeps it in its own persisted slot so a
//! restart lands back on the same account.
//!
//! ```text
//! startup ──► SessionStore::restore ──► current_user() = Some(user) | None
//! login   ──► authenticate ──► save slot ──► current_user() = Some(user)
//! logout  ──► remove slot  ──► current_user() = None
//! ```

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use warung_core::auth::authenticate;
use warung_core::{Action, AuthError, User, SESSION_KEY};
use warung_db::{DbResult, Persistence};

#[derive(Debug)]
pub struct SessionStore {
    persistence: Persistence,
    current: RwLock<Option<User>>,
    /// Last failed slot write, until someone takes it.
    warning: Mutex<Option<String>>,
}

impl SessionStore {
    /// Restores the user saved by an earlier session, if any.
    pub async fn restore(persistence: Persistence) -> Self {
        let user: Option<User> = persistence.load(SESSION_KEY, || None).await;

        if let Some(user) = &user {
            info!(username = %user.username, role = %user.role, "Session restored");
        }

        SessionStore {
            persistence,
            current: RwLock::new(user),
            warning: Mutex::new(None),
        }
    }

    async fn record(&self, result: DbResult<()>) {
        if let Err(e) = result {
            warn!(error = %e, "Session may not be remembered");
            *self.warning.lock().await =
                Some(format!("Session may not be remembered: {}", e));
        }
    }

    /// Returns and clears the last persistence warning.
    pub async fn take_persistence_warning(&self) -> Option<String> {
        self.warning.lock().await.take()
    }

    /// Checks the credentials and makes that account the current user.
    ///
    /// A failed save becomes a persistence warning; the login still
    /// succeeds for this run.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = match authenticate(username, password) {
            Ok(user) => user,
            Err(e) => {
                info!(username = %username, "Login rejected");
                return Err(e);
            }
        };

        let mut current = self.current.write().await;
        let saved = self.persistence.save(SESSION_KEY, &user).await;
        self.record(saved).await;
        *current = Some(user.clone());

        info!(username = %user.username, role = %user.role, "Logged in");
        Ok(user)
    }

    /// Forgets the current user. A failed removal becomes a persistence
    /// warning.
    pub async fn logout(&self) {
        let mut current = self.current.write().await;
        if let Some(user) = current.take() {
            info!(username = %user.username, "Logged out");
        }
        let removed = self.persistence.remove(SESSION_KEY).await;
        self.record(removed).await;
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    /// Whether the current user may open `action`. False when logged out.
    pub async fn can(&self, action: Action) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(|user| user.can(action))
    }
}
