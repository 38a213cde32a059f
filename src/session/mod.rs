//! Session store: the single authenticated identity and its persistence.
//!
//! Credentials are never verified. Login and register synthesize an identity,
//! write it to local storage under [`SESSION_KEY`] and make it current.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::clock::{Clock, IdSequence};
use crate::errors::AppError;
use crate::models::{Identity, Role};
use crate::storage::KeyValueStore;

/// Local-storage key holding the serialized identity.
pub const SESSION_KEY: &str = "user";

struct SessionSlot {
    current: Option<Identity>,
    /// Bumped by every logout; in-flight logins started under an older
    /// generation must not install their identity.
    generation: u64,
}

/// Holds the current identity and mirrors it into a [`KeyValueStore`].
pub struct SessionStore<S> {
    storage: S,
    clock: Arc<dyn Clock>,
    latency: Duration,
    ids: IdSequence,
    slot: RwLock<SessionSlot>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Build the store, restoring a persisted identity when one is present
    /// and well-formed.
    pub async fn restore(storage: S, clock: Arc<dyn Clock>, latency: Duration) -> Self {
        let current = match storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => {
                    tracing::info!(
                        "Restored session for {} ({})",
                        identity.email,
                        identity.role.as_str()
                    );
                    Some(identity)
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed stored session: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Could not read stored session: {}", e);
                None
            }
        };

        Self {
            storage,
            clock,
            latency,
            ids: IdSequence::new(),
            slot: RwLock::new(SessionSlot {
                current,
                generation: 0,
            }),
        }
    }

    /// Start a session from an email and password.
    ///
    /// The display name is the local part of the email.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<Identity, AppError> {
        let generation = self.generation().await;
        self.round_trip().await;

        if email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        let name = email.split('@').next().unwrap_or(email);
        let identity = self.synthesize(name, email, role);
        self.install(identity, generation).await
    }

    /// Create an account and start a session for it.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, AppError> {
        let generation = self.generation().await;
        self.round_trip().await;

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidRegistrationData);
        }

        let identity = self.synthesize(name, email, role);
        self.install(identity, generation).await
    }

    /// End the session. Always clears the in-memory identity, even when the
    /// storage backend fails.
    pub async fn logout(&self) {
        let mut slot = self.slot.write().await;

        if let Err(e) = self.storage.remove(SESSION_KEY).await {
            tracing::warn!("Failed to clear stored session: {}", e);
        }

        if let Some(previous) = slot.current.take() {
            tracing::info!("Logged out {}", previous.email);
        }
        slot.generation += 1;
    }

    pub async fn current(&self) -> Option<Identity> {
        self.slot.read().await.current.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.slot.read().await.current.is_some()
    }

    pub async fn role(&self) -> Option<Role> {
        self.slot.read().await.current.as_ref().map(|i| i.role)
    }

    async fn generation(&self) -> u64 {
        self.slot.read().await.generation
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn synthesize(&self, name: &str, email: &str, role: Role) -> Identity {
        Identity {
            id: self.ids.next("user", self.clock.now()),
            name: name.to_string(),
            email: email.to_string(),
            role,
            profile_image: Some(role.default_avatar().to_string()),
        }
    }

    async fn install(&self, identity: Identity, generation: u64) -> Result<Identity, AppError> {
        let mut slot = self.slot.write().await;
        if slot.generation != generation {
            tracing::warn!("Dropping stale session for {}", identity.email);
            return Err(AppError::SessionSuperseded);
        }

        let encoded = serde_json::to_string(&identity)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {}", e)))?;
        self.storage.set(SESSION_KEY, &encoded).await?;

        tracing::info!(
            "Session started for {} ({})",
            identity.email,
            identity.role.as_str()
        );
        slot.current = Some(identity.clone());
        Ok(identity)
    }
}
