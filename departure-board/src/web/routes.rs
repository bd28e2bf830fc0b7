//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::debug;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/boards", get(list_boards))
        .route("/api/boards/:index", get(get_board))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every board, in configured order.
async fn list_boards(State(state): State<AppState>) -> Json<BoardsResponse> {
    let boards = state
        .boards
        .boards()
        .iter()
        .map(BoardView::from_snapshot)
        .collect();

    Json(BoardsResponse { boards })
}

/// One board by its position in the stop list.
async fn get_board(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<BoardView>, AppError> {
    let snapshot = state.boards.board(index).ok_or_else(|| AppError::NotFound {
        message: format!("No board at index {index}"),
    })?;

    Ok(Json(BoardView::from_snapshot(&snapshot)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        debug!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
