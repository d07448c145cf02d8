use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::message::WorkerMessage;
use super::store::UpdateStore;
use crate::error::UpdateError;

/// Point-in-time view of the two update flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateSnapshot {
    pub update_available: bool,
    pub banner_dismissed: bool,
}

impl UpdateSnapshot {
    pub fn banner_visible(&self) -> bool {
        self.update_available && !self.banner_dismissed
    }
}

#[derive(Debug, Default)]
struct UpdateState {
    update_available: AtomicBool,
    banner_dismissed: AtomicBool,
}

/// Owns the per-session update state. Mounting a provider starts a session at
/// `(update_available = false, banner_dismissed = false)`.
#[derive(Debug)]
pub struct UpdateProvider {
    context: UpdateContext,
}

impl UpdateProvider {
    pub fn mount(store: UpdateStore) -> Self {
        Self {
            context: UpdateContext {
                state: Arc::new(UpdateState::default()),
                store,
            },
        }
    }

    pub fn context(&self) -> UpdateContext {
        self.context.clone()
    }
}

impl Default for UpdateProvider {
    /// Mounts against the process-wide [`UpdateStore::global`].
    fn default() -> Self {
        Self::mount(UpdateStore::global())
    }
}

/// Handle to a mounted provider's state and commands.
#[derive(Debug, Clone)]
pub struct UpdateContext {
    state: Arc<UpdateState>,
    store: UpdateStore,
}

impl UpdateContext {
    pub fn update_available(&self) -> bool {
        self.state.update_available.load(Ordering::SeqCst)
    }

    pub(crate) fn store(&self) -> &UpdateStore {
        &self.store
    }

    pub fn banner_dismissed(&self) -> bool {
        self.state.banner_dismissed.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> UpdateSnapshot {
        UpdateSnapshot {
            update_available: self.update_available(),
            banner_dismissed: self.banner_dismissed(),
        }
    }

    pub fn set_update_available(&self, available: bool) {
        self.state
            .update_available
            .store(available, Ordering::SeqCst);
    }

    /// One-way for the lifetime of the session.
    pub fn dismiss_banner(&self) {
        self.state.banner_dismissed.store(true, Ordering::SeqCst);
    }

    /// Asks the waiting worker, if any, to take over. The flags are left
    /// untouched; the reload that follows takeover resets them.
    pub fn apply_update(&self) {
        match self.store.waiting_worker() {
            Some(worker) => {
                tracing::info!("posting SKIP_WAITING to waiting service worker");
                worker.post_message(&WorkerMessage::SkipWaiting);
            }
            None => tracing::debug!("apply_update with no waiting worker; ignoring"),
        }
    }
}

/// Ambient lookup of the nearest mounted provider.
#[derive(Debug, Clone, Default)]
pub struct UpdateScope {
    provider: Option<UpdateContext>,
}

impl UpdateScope {
    pub fn unmounted() -> Self {
        Self::default()
    }

    pub fn with_provider(provider: &UpdateProvider) -> Self {
        Self {
            provider: Some(provider.context()),
        }
    }

    /// Fails fast when no provider is mounted; there is no default state.
    pub fn use_update(&self) -> Result<UpdateContext, UpdateError> {
        self.provider.clone().ok_or(UpdateError::ProviderMissing)
    }
}
