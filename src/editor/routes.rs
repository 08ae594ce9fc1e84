//! REST endpoints for loading and saving files.

use std::sync::Arc;

use axum::extract::{FromRequest, Query, Request, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Form, Json, Router};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::controller::FileEditController;
use super::model::{LoadRequest, OperationResult, SaveRequest};
use crate::error::EditError;

/// Shared state for editor routes.
#[derive(Clone)]
pub struct EditorRouteState {
    pub controller: Arc<FileEditController>,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "text-editor"
    }))
}

/// GET /ajax/loadfile?dir=...&filename=...
async fn load_file(
    State(state): State<EditorRouteState>,
    Query(req): Query<LoadRequest>,
) -> impl IntoResponse {
    state.controller.load(&req.directory, &req.filename).await
}

/// PUT /ajax/savefile
///
/// Body fields: `path`, `filecontents`, `mtime`.
async fn save_file(
    State(state): State<EditorRouteState>,
    SaveBody(req): SaveBody,
) -> impl IntoResponse {
    state
        .controller
        .save(&req.path, &req.contents, req.mtime)
        .await
}

/// Save body accepted as JSON or as a urlencoded form.
///
/// Browsers posting with default settings send a form, API clients send JSON.
/// A body neither decoder accepts is answered with the usual error payload.
pub struct SaveBody(pub SaveRequest);

impl<S> FromRequest<S> for SaveBody
where
    S: Send + Sync,
{
    type Rejection = OperationResult;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        let parsed = if is_json {
            Json::<SaveRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|rejection| rejection.body_text())
        } else {
            Form::<SaveRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|rejection| rejection.body_text())
        };

        parsed.map(SaveBody).map_err(|reason| {
            warn!(reason = %reason, "Rejected save body");
            OperationResult::bad_request(EditError::InvalidBody.user_message())
        })
    }
}

/// Build the editor routes.
pub fn editor_routes(controller: Arc<FileEditController>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ajax/loadfile", get(load_file))
        .route("/ajax/savefile", put(save_file))
        .with_state(EditorRouteState { controller })
        .layer(TraceLayer::new_for_http())
}
