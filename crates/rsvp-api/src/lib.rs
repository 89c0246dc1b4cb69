pub mod auth;
pub mod error;
pub mod hunt;
pub mod messages;
pub mod middleware;
pub mod routes;

pub use auth::{AppState, AppStateInner};
pub use routes::app;
