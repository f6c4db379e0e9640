//! Account and category provisioning.
//!
//! Thin create/read/status ops. The balance itself is never written here:
//! only the transfer engine and the obligation processor touch it, always
//! paired with a ledger row.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    BankAccount, EngineError, EntityStatus, ResultEngine, bank_accounts, categories,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Create a bank account for a user with an opening balance.
    pub async fn new_bank_account(
        &self,
        user_id: &str,
        name: &str,
        opening_balance_minor: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "account")?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let exists = bank_accounts::Entity::find()
                .filter(bank_accounts::Column::UserId.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let account = BankAccount::new(user_id.to_string(), name, opening_balance_minor);
            let account_id = account.id;
            bank_accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account_id)
        })
    }

    /// Return an account snapshot.
    pub async fn bank_account(
        &self,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<BankAccount> {
        with_tx!(self, |db_tx| {
            let model = self
                .find_account_owned(&db_tx, account_id, user_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("bank account not exists".to_string()))?;
            BankAccount::try_from(model)
        })
    }

    /// Move an account to a new lifecycle status (soft-delete bookkeeping).
    pub async fn set_account_status(
        &self,
        account_id: Uuid,
        user_id: &str,
        status: EntityStatus,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_account_owned(&db_tx, account_id, user_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("bank account not exists".to_string()))?;

            let active = bank_accounts::ActiveModel {
                id: ActiveValue::Set(account_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Create a category for a user.
    pub async fn new_category(&self, user_id: &str, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let exists = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let category_id = Uuid::new_v4();
            let active = categories::ActiveModel {
                id: ActiveValue::Set(category_id.to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name),
                status: ActiveValue::Set(EntityStatus::Active.as_str().to_string()),
            };
            active.insert(&db_tx).await?;
            Ok(category_id)
        })
    }
}
