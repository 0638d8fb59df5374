//! Catalog listing, search and deep-link handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use fcr_core::{
    catalog::{FindQuery, Pagination, SearchQuery, SortOrder},
    domain::FileId,
};

use super::{error_response, AppState};
use crate::types::{LatestParams, LinkResponse, PageResponse, SearchParams};

/// Newest-first listing.
pub async fn latest(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = LatestParams::from_pairs(&pairs);
    let paging = Pagination::parse(
        params.page.as_deref(),
        params.per_page.as_deref(),
        Pagination::LATEST_PER_PAGE,
    )
    .capped(state.settings.max_per_page);

    run_find(&state, FindQuery::latest(paging), paging, "/api/latest").await
}

/// Text / year / type search.
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = SearchParams::from_pairs(&pairs);
    let paging = Pagination::parse(
        params.page.as_deref(),
        params.per_page.as_deref(),
        Pagination::SEARCH_PER_PAGE,
    )
    .capped(state.settings.max_per_page);

    let query = SearchQuery::new(paging)
        .text(params.q.as_deref())
        .year(params.year.as_deref())
        .file_type(params.file_type.as_deref())
        .sort(SortOrder::parse(params.sort.as_deref()));

    debug!(?query, "catalog search");
    let find = query.to_find(&state.settings.search_field);
    run_find(&state, find, paging, "/api/search").await
}

async fn run_find(
    state: &AppState,
    find: FindQuery,
    paging: Pagination,
    endpoint: &'static str,
) -> Response {
    match state.catalog.find(&find).await {
        Ok(items) => Json(PageResponse {
            page: paging.page,
            per_page: paging.per_page,
            items,
        })
        .into_response(),
        Err(e) => {
            error!(endpoint, error = %e, "catalog query failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

/// Deep link that makes the catalog bot send the file to the user.
pub async fn send_link(State(state): State<AppState>, file_id: Option<Path<String>>) -> Response {
    let Some(file_id) = file_id.and_then(|Path(raw)| FileId::parse(&raw)) else {
        return error_response(StatusCode::BAD_REQUEST, "file_id required");
    };

    Json(LinkResponse {
        link: state.settings.deeplink.link_for(&file_id),
    })
    .into_response()
}
