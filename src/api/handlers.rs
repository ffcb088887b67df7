//! HTTP handlers for the ticket endpoints
//!
//! Handlers accept their extractors as `Result` so that malformed JSON or
//! query strings come back in the response envelope instead of axum's
//! plain-text rejections.

use super::AppState;
use super::dto::{
    ApiResponse, CancelAllResponse, CommentRequest, CreateTicketRequest, HealthResponse,
    ListParams,
};
use super::error::ApiError;
use crate::core::{Ticket, TicketId};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;

type ApiResult<T> = Result<T, ApiError>;
type TicketResponse = Json<ApiResponse<Ticket>>;

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub(crate) async fn root() -> &'static str {
    "ticket-desk is running. See /api/tickets"
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        service: st.build.service,
        version: st.build.version,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/tickets
// ---------------------------------------------------------------------------

pub(crate) async fn create_ticket(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, TicketResponse)> {
    let Json(request) = payload?;
    let (title, content) = request.into_fields()?;

    let ticket = st.tickets.create(&title, &content).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ticket))))
}

// ---------------------------------------------------------------------------
// GET /api/tickets
// ---------------------------------------------------------------------------

pub(crate) async fn list_tickets(
    State(st): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Ticket>>>> {
    let Query(params) = params?;
    let query = params.into_query()?;

    let tickets = st.tickets.list(&query).await?;
    Ok(Json(ApiResponse::success(tickets)))
}

// ---------------------------------------------------------------------------
// PUT /api/tickets/start/:id
// ---------------------------------------------------------------------------

pub(crate) async fn start_ticket(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TicketResponse> {
    let id: TicketId = id.parse()?;

    let ticket = st.tickets.start(&id).await?;
    Ok(Json(ApiResponse::success(ticket)))
}

// ---------------------------------------------------------------------------
// PUT /api/tickets/complete/:id
// ---------------------------------------------------------------------------

pub(crate) async fn complete_ticket(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<TicketResponse> {
    let Json(request) = payload?;
    let comment = request.into_comment()?;
    let id: TicketId = id.parse()?;

    let ticket = st.tickets.complete(&id, &comment).await?;
    Ok(Json(ApiResponse::success(ticket)))
}

// ---------------------------------------------------------------------------
// PUT /api/tickets/cancel/:id
// ---------------------------------------------------------------------------

pub(crate) async fn cancel_ticket(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<TicketResponse> {
    let Json(request) = payload?;
    let comment = request.into_comment()?;
    let id: TicketId = id.parse()?;

    let ticket = st.tickets.cancel(&id, &comment).await?;
    Ok(Json(ApiResponse::success(ticket)))
}

// ---------------------------------------------------------------------------
// PUT /api/tickets/cancel-all
// ---------------------------------------------------------------------------

pub(crate) async fn cancel_all_tickets(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<CancelAllResponse>>> {
    let Json(request) = payload?;
    let comment = request.into_comment()?;

    let cancelled = st.tickets.cancel_all_in_progress(&comment).await?;
    Ok(Json(
        ApiResponse::success(CancelAllResponse { cancelled })
            .with_message(format!("Cancelled {cancelled} ticket(s)")),
    ))
}
