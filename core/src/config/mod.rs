//! Site configuration.
//!
//! - `types.rs` (data structures + defaults)
//! - `load.rs`  (IO: load_default + env overrides)

pub mod load;
pub mod types;

pub use load::{apply_env_overrides, load_default, load_from};
pub use types::*;
