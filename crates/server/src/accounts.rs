//! Account and category API endpoints

use api_types::account::{AccountNew, AccountStatusUpdate, AccountView, CategoryNew, Created};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_status(status: engine::EntityStatus) -> api_types::EntityStatus {
    match status {
        engine::EntityStatus::Active => api_types::EntityStatus::Active,
        engine::EntityStatus::Suspended => api_types::EntityStatus::Suspended,
        engine::EntityStatus::Archived => api_types::EntityStatus::Archived,
        engine::EntityStatus::Deleted => api_types::EntityStatus::Deleted,
        engine::EntityStatus::Locked => api_types::EntityStatus::Locked,
        engine::EntityStatus::Pending => api_types::EntityStatus::Pending,
    }
}

pub(crate) fn map_status_in(status: api_types::EntityStatus) -> engine::EntityStatus {
    match status {
        api_types::EntityStatus::Active => engine::EntityStatus::Active,
        api_types::EntityStatus::Suspended => engine::EntityStatus::Suspended,
        api_types::EntityStatus::Archived => engine::EntityStatus::Archived,
        api_types::EntityStatus::Deleted => engine::EntityStatus::Deleted,
        api_types::EntityStatus::Locked => engine::EntityStatus::Locked,
        api_types::EntityStatus::Pending => engine::EntityStatus::Pending,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<Json<Created>, ServerError> {
    let id = state
        .engine
        .new_bank_account(&user.username, &payload.name, payload.opening_balance_minor)
        .await?;
    Ok(Json(Created { id }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.bank_account(id, &user.username).await?;
    Ok(Json(AccountView {
        id: account.id,
        name: account.name,
        balance_minor: account.balance_minor,
        status: map_status(account.status),
    }))
}

pub async fn set_status(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountStatusUpdate>,
) -> Result<(), ServerError> {
    state
        .engine
        .set_account_status(id, &user.username, map_status_in(payload.status))
        .await?;
    Ok(())
}

pub async fn create_category(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<Json<Created>, ServerError> {
    let id = state
        .engine
        .new_category(&user.username, &payload.name)
        .await?;
    Ok(Json(Created { id }))
}
