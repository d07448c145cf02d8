use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::context::{UpdateContext, UpdateProvider};
use super::message::WorkerHandle;
use super::store::UpdateStore;

/// Performs the full page reload after takeover.
pub trait Reloader: Send + Sync {
    fn reload(&self);
}

/// Bridges service-worker lifecycle events into the store and context.
pub struct Registration {
    store: UpdateStore,
    context: UpdateContext,
    reloader: Arc<dyn Reloader>,
    refreshing: AtomicBool,
}

impl Registration {
    pub fn new(store: UpdateStore, context: UpdateContext, reloader: Arc<dyn Reloader>) -> Self {
        Self {
            store,
            context,
            reloader,
            refreshing: AtomicBool::new(false),
        }
    }

    /// Registers against the store the provider was mounted on.
    pub fn attach(provider: &UpdateProvider, reloader: Arc<dyn Reloader>) -> Self {
        let context = provider.context();
        Self::new(context.store().clone(), context, reloader)
    }

    /// A new version is installed and waiting.
    ///
    /// The handle is stored before the flag flips so a refresh click can never
    /// find an empty store.
    pub fn on_new_worker_waiting(&self, worker: Arc<dyn WorkerHandle>) {
        self.store.set_waiting_worker(Some(worker));
        self.context.set_update_available(true);
        tracing::info!("new service worker version waiting");
    }

    /// A worker reached `installed`. Without a current controller this is the
    /// first install, not an update, and nothing is announced.
    pub fn on_worker_installed(&self, worker: Arc<dyn WorkerHandle>, has_controller: bool) {
        if has_controller {
            self.on_new_worker_waiting(worker);
        } else {
            tracing::debug!("service worker installed for the first time");
        }
    }

    /// The waiting worker took control. Reloads at most once per
    /// registration; returns whether this call triggered the reload.
    pub fn on_controller_change(&self) -> bool {
        if self.refreshing.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::info!("service worker controller changed; reloading");
        self.reloader.reload();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::{UpdateProvider, WorkerMessage};
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingReloader(AtomicUsize);

    impl Reloader for CountingReloader {
        fn reload(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct NullWorker;

    impl WorkerHandle for NullWorker {
        fn post_message(&self, _message: &WorkerMessage) {}
    }

    fn registration() -> (Registration, UpdateStore, UpdateContext, Arc<CountingReloader>) {
        let store = UpdateStore::new();
        let context = UpdateProvider::mount(store.clone()).context();
        let reloader = Arc::new(CountingReloader::default());
        let reg = Registration::new(store.clone(), context.clone(), reloader.clone());
        (reg, store, context, reloader)
    }

    #[test]
    fn test_waiting_worker_stored_and_announced() {
        let (reg, store, context, _) = registration();
        reg.on_new_worker_waiting(Arc::new(NullWorker));
        assert!(store.waiting_worker().is_some());
        assert!(context.update_available());
    }

    #[test]
    fn test_first_install_is_not_an_update() {
        let (reg, store, context, _) = registration();
        reg.on_worker_installed(Arc::new(NullWorker), false);
        assert!(store.waiting_worker().is_none());
        assert!(!context.update_available());

        reg.on_worker_installed(Arc::new(NullWorker), true);
        assert!(store.waiting_worker().is_some());
        assert!(context.update_available());
    }

    #[test]
    fn test_attach_shares_provider_store() {
        let store = UpdateStore::new();
        let provider = UpdateProvider::mount(store.clone());
        let reg = Registration::attach(&provider, Arc::new(CountingReloader::default()));

        reg.on_new_worker_waiting(Arc::new(NullWorker));
        assert!(store.waiting_worker().is_some());
        assert!(provider.context().update_available());
    }

    #[test]
    fn test_reload_only_once() {
        let (reg, _, _, reloader) = registration();
        assert!(reg.on_controller_change());
        assert!(!reg.on_controller_change());
        assert!(!reg.on_controller_change());
        assert_eq!(reloader.0.load(Ordering::SeqCst), 1);
    }
}
