//! Service-worker update lifecycle.
//!
//! Registration detects a waiting worker, stores it in the [`UpdateStore`] and
//! flips `update_available` on the [`UpdateContext`]; the banner offers
//! refresh (post `SKIP_WAITING` to the waiting worker) or dismiss; the
//! controller-change signal then reloads the page exactly once.

mod banner;
mod context;
mod message;
mod registration;
mod store;

pub use banner::{Banner, BannerAction};
pub use context::{UpdateContext, UpdateProvider, UpdateScope, UpdateSnapshot};
pub use message::{WorkerHandle, WorkerMessage};
pub use registration::{Registration, Reloader};
pub use store::UpdateStore;
