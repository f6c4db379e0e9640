//! The balance transfer engine.
//!
//! Moves a sum between two accounts of the same user with all-or-nothing
//! semantics. The debit, the credit, and the transfer row commit together or
//! not at all; reversal on soft delete undoes the pair the same way.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, EntityStatus, ResultEngine, Transfer, bank_accounts, transfers,
    util::require_positive_amount,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Apply a signed delta to an account balance as a single SQL update.
    ///
    /// `balance_minor = balance_minor + delta` is evaluated by the storage
    /// layer, never read into memory first, so two concurrent transactions on
    /// the same account cannot lose an update.
    pub(super) async fn adjust_balance(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
        delta_minor: i64,
    ) -> ResultEngine<()> {
        let result = bank_accounts::Entity::update_many()
            .col_expr(
                bank_accounts::Column::BalanceMinor,
                Expr::col(bank_accounts::Column::BalanceMinor).add(delta_minor),
            )
            .filter(bank_accounts::Column::Id.eq(account_id.to_string()))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "bank account not exists".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a transfer between two accounts of the same user.
    ///
    /// Transfers hard-reject insufficient funds: unlike the obligation
    /// processor they never take the source account negative.
    pub async fn create_transfer(
        &self,
        user_id: &str,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount_minor: i64,
        description: Option<&str>,
        date: NaiveDate,
    ) -> ResultEngine<Transfer> {
        require_positive_amount(amount_minor)?;
        if from_account_id == to_account_id {
            return Err(EngineError::InvalidAmount(
                "from_account_id and to_account_id must differ".to_string(),
            ));
        }
        let description = normalize_optional_text(description);
        let created_at = Utc::now();

        with_tx!(self, |db_tx| {
            let from_model = self
                .require_active_account(&db_tx, from_account_id, user_id)
                .await?;
            self.require_active_account(&db_tx, to_account_id, user_id)
                .await?;

            if from_model.balance_minor < amount_minor {
                return Err(EngineError::InsufficientFunds(format!(
                    "account {from_account_id} holds {} minor units, transfer needs {amount_minor}",
                    from_model.balance_minor
                )));
            }

            let transfer = Transfer::new(
                user_id.to_string(),
                from_account_id,
                to_account_id,
                amount_minor,
                date,
                description,
                created_at,
            )?;
            transfers::ActiveModel::from(&transfer).insert(&db_tx).await?;

            self.adjust_balance(&db_tx, from_account_id, -amount_minor)
                .await?;
            self.adjust_balance(&db_tx, to_account_id, amount_minor)
                .await?;

            Ok(transfer)
        })
    }

    /// Soft-delete a transfer, reversing its balance effect exactly.
    ///
    /// The reversal withdraws `amount` back from the destination account, so
    /// it is rejected outright when that account no longer holds the funds:
    /// a reversal must not drive the destination negative.
    pub async fn delete_transfer(&self, user_id: &str, transfer_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let transfer_model = self
                .require_active_transfer(&db_tx, transfer_id, user_id)
                .await?;
            let transfer = Transfer::try_from(transfer_model)?;

            let to_model = self
                .find_account_owned(&db_tx, transfer.to_account_id, user_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("bank account not exists".to_string()))?;
            self.find_account_owned(&db_tx, transfer.from_account_id, user_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("bank account not exists".to_string()))?;

            if to_model.balance_minor < transfer.amount_minor {
                return Err(EngineError::InsufficientFunds(format!(
                    "account {} holds {} minor units, reversal needs {}",
                    transfer.to_account_id, to_model.balance_minor, transfer.amount_minor
                )));
            }

            self.adjust_balance(&db_tx, transfer.from_account_id, transfer.amount_minor)
                .await?;
            self.adjust_balance(&db_tx, transfer.to_account_id, -transfer.amount_minor)
                .await?;

            let active = transfers::ActiveModel {
                id: ActiveValue::Set(transfer_id.to_string()),
                status: ActiveValue::Set(EntityStatus::Deleted.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Update the mutable fields of a transfer.
    ///
    /// Only `description` and `date` may change. Amount and account ids are
    /// immutable; an amount change is modeled as delete + recreate.
    pub async fn update_transfer(
        &self,
        user_id: &str,
        transfer_id: Uuid,
        description: Option<&str>,
        date: Option<NaiveDate>,
    ) -> ResultEngine<Transfer> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_active_transfer(&db_tx, transfer_id, user_id)
                .await?;
            let mut transfer = Transfer::try_from(model)?;

            if let Some(value) = description {
                transfer.description = normalize_optional_text(Some(value));
            }
            if let Some(value) = date {
                transfer.date = value;
            }

            let active = transfers::ActiveModel {
                id: ActiveValue::Set(transfer_id.to_string()),
                description: ActiveValue::Set(transfer.description.clone()),
                date: ActiveValue::Set(transfer.date),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(transfer)
        })
    }

    /// Return a transfer snapshot, regardless of status.
    pub async fn transfer(&self, user_id: &str, transfer_id: Uuid) -> ResultEngine<Transfer> {
        with_tx!(self, |db_tx| {
            let model = transfers::Entity::find_by_id(transfer_id.to_string())
                .filter(transfers::Column::UserId.eq(user_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transfer not exists".to_string()))?;
            Transfer::try_from(model)
        })
    }

    /// List a user's transfers, newest first.
    pub async fn list_transfers(
        &self,
        user_id: &str,
        include_deleted: bool,
    ) -> ResultEngine<Vec<Transfer>> {
        with_tx!(self, |db_tx| {
            let mut query = transfers::Entity::find()
                .filter(transfers::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(transfers::Column::CreatedAt);
            if !include_deleted {
                query = query.filter(
                    transfers::Column::Status.ne(EntityStatus::Deleted.as_str()),
                );
            }

            let models = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Transfer::try_from(model)?);
            }
            Ok(out)
        })
    }
}
