//! HTTP front: router, middleware and server lifecycle.

pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use state::AppState;
