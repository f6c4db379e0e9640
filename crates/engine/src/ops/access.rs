//! Ownership and visibility checks shared by the operations.
//!
//! Every lookup answers "not found" for rows the caller does not own, so the
//! API never reveals whether a foreign id exists.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityStatus, ResultEngine, bank_accounts, categories, transfers, users};

use super::Engine;

impl Engine {
    /// Load an account owned by `user_id`, regardless of status.
    pub(super) async fn find_account_owned(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Option<bank_accounts::Model>> {
        bank_accounts::Entity::find_by_id(account_id.to_string())
            .filter(bank_accounts::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Load an account owned by `user_id` and require it to be active.
    ///
    /// Suspended/locked/archived accounts are reported as not found: they
    /// must neither fund nor receive balance changes.
    pub(super) async fn require_active_account(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<bank_accounts::Model> {
        let model = self
            .find_account_owned(db, account_id, user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("bank account not exists".to_string()))?;
        let status = EntityStatus::try_from(model.status.as_str())?;
        if !status.is_active() {
            return Err(EngineError::KeyNotFound(
                "bank account not exists".to_string(),
            ));
        }
        Ok(model)
    }

    /// Require an active category owned by `user_id`.
    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        category_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<categories::Model> {
        let model = categories::Entity::find_by_id(category_id.to_string())
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .filter(categories::Column::Status.eq(EntityStatus::Active.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
        Ok(model)
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    /// Require an active transfer owned by `user_id`.
    pub(super) async fn require_active_transfer(
        &self,
        db: &DatabaseTransaction,
        transfer_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<transfers::Model> {
        let model = transfers::Entity::find_by_id(transfer_id.to_string())
            .filter(transfers::Column::UserId.eq(user_id.to_string()))
            .filter(transfers::Column::Status.eq(EntityStatus::Active.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transfer not exists".to_string()))?;
        Ok(model)
    }
}
