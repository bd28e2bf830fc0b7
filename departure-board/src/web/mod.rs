//! Web layer for the departure boards.
//!
//! Serves read-only JSON snapshots of every board.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
