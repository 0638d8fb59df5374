//! Watch / download redirects backed by the file relay

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use fcr_core::domain::Operation;

use super::{error_response, AppState};

pub async fn watch(State(state): State<AppState>, file_id: Option<Path<String>>) -> Response {
    relay_redirect(&state, Operation::Watch, file_id).await
}

pub async fn download(State(state): State<AppState>, file_id: Option<Path<String>>) -> Response {
    relay_redirect(&state, Operation::Download, file_id).await
}

async fn relay_redirect(
    state: &AppState,
    op: Operation,
    file_id: Option<Path<String>>,
) -> Response {
    let raw = file_id.map(|Path(raw)| raw).unwrap_or_default();

    match state.relay.handle(op, &raw).await {
        Ok(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            error_response(status, e.to_string())
        }
    }
}
