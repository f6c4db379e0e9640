//! Transfer API endpoints

use api_types::transfer::{TransferListResponse, TransferNew, TransferUpdate, TransferView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, accounts::map_status, server::ServerState, user};

fn map_transfer(transfer: engine::Transfer) -> TransferView {
    TransferView {
        id: transfer.id,
        from_account_id: transfer.from_account_id,
        to_account_id: transfer.to_account_id,
        amount_minor: transfer.amount_minor,
        date: transfer.date,
        description: transfer.description,
        status: map_status(transfer.status),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<Json<TransferView>, ServerError> {
    let transfer = state
        .engine
        .create_transfer(
            &user.username,
            payload.from_account_id,
            payload.to_account_id,
            payload.amount_minor,
            payload.description.as_deref(),
            payload.date,
        )
        .await?;
    Ok(Json(map_transfer(transfer)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferView>, ServerError> {
    let transfer = state.engine.transfer(&user.username, id).await?;
    Ok(Json(map_transfer(transfer)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub include_deleted: Option<bool>,
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransferListResponse>, ServerError> {
    let transfers = state
        .engine
        .list_transfers(&user.username, query.include_deleted.unwrap_or(false))
        .await?;
    Ok(Json(TransferListResponse {
        transfers: transfers.into_iter().map(map_transfer).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransferUpdate>,
) -> Result<Json<TransferView>, ServerError> {
    let transfer = state
        .engine
        .update_transfer(
            &user.username,
            id,
            payload.description.as_deref(),
            payload.date,
        )
        .await?;
    Ok(Json(map_transfer(transfer)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transfer(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
