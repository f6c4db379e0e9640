//! The module contains the `BankAccount` struct and its persistence model.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityStatus, ResultEngine, util::parse_uuid};

/// A bank account.
///
/// The account's `balance_minor` is the only shared mutable resource in the
/// engine. It is mutated exclusively by atomic SQL increments issued inside a
/// transaction that also persists the causing ledger row (an expense or a
/// transfer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankAccount {
    /// Stable identifier, generated once and persisted as a string.
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// Balance in minor units (cents). Signed: the obligation processor may
    /// take an account negative.
    pub balance_minor: i64,
    pub status: EntityStatus,
}

impl BankAccount {
    pub fn new(user_id: String, name: String, balance_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            balance_minor,
            status: EntityStatus::Active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub balance_minor: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fixed_expenses::Entity")]
    FixedExpenses,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::fixed_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedExpenses.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BankAccount> for ActiveModel {
    fn from(account: &BankAccount) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            user_id: ActiveValue::Set(account.user_id.clone()),
            name: ActiveValue::Set(account.name.clone()),
            balance_minor: ActiveValue::Set(account.balance_minor),
            status: ActiveValue::Set(account.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for BankAccount {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "bank account")?,
            user_id: model.user_id,
            name: model.name,
            balance_minor: model.balance_minor,
            status: EntityStatus::try_from(model.status.as_str())?,
        })
    }
}
