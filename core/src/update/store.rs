use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;

use super::message::WorkerHandle;

type Slot = Option<Arc<dyn WorkerHandle>>;

lazy_static! {
    static ref GLOBAL_STORE: UpdateStore = UpdateStore::new();
}

/// Holds the worker that finished installing and is waiting to take over.
///
/// Last write wins. Clones share the same slot; [`UpdateStore::global`] is the
/// process-wide instance that `UpdateProvider::default()` mounts on, tests
/// construct their own.
#[derive(Clone, Default)]
pub struct UpdateStore {
    slot: Arc<RwLock<Slot>>,
}

impl UpdateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> Self {
        GLOBAL_STORE.clone()
    }

    pub fn set_waiting_worker(&self, worker: Option<Arc<dyn WorkerHandle>>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = worker;
    }

    pub(crate) fn waiting_worker(&self) -> Option<Arc<dyn WorkerHandle>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for UpdateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateStore")
            .field("waiting", &self.waiting_worker().is_some())
            .finish()
    }
}
