//! Web layer for the running-status server.
//!
//! Serves the running-status lookup as JSON or as an HTML fragment, plus
//! the static frontend.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
