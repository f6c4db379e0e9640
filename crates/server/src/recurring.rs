//! Fixed expense API endpoints, including the batch trigger.
//!
//! `POST /recurring/process` is the external scheduler's entry point: the
//! server itself never runs a timer.

use api_types::account::Created;
use api_types::fixed_expense::{
    FixedExpenseNew, OccurrenceQuery, OccurrenceResponse, ProcessResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_recurrence(kind: api_types::RecurrenceKind) -> engine::RecurrenceKind {
    match kind {
        api_types::RecurrenceKind::Monthly => engine::RecurrenceKind::Monthly,
        api_types::RecurrenceKind::Yearly => engine::RecurrenceKind::Yearly,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<FixedExpenseNew>,
) -> Result<Json<Created>, ServerError> {
    let id = state
        .engine
        .new_fixed_expense(
            &user.username,
            payload.bank_account_id,
            payload.category_id,
            &payload.name,
            payload.amount_minor,
            payload.due_date,
            map_recurrence(payload.recurrence),
        )
        .await?;
    Ok(Json(Created { id }))
}

pub async fn occurrence(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OccurrenceQuery>,
) -> Result<Json<OccurrenceResponse>, ServerError> {
    let date = state
        .engine
        .occurrence_in_month(&user.username, id, query.year, query.month)
        .await?;
    Ok(Json(OccurrenceResponse { date }))
}

pub async fn process(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ProcessResponse>, ServerError> {
    let report = state.engine.process_due_fixed_expenses(Utc::now()).await?;
    Ok(Json(ProcessResponse {
        examined: report.examined,
        processed: report.processed,
        skipped: report.skipped,
    }))
}
