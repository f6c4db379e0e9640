//! Materialized expense rows.
//!
//! An `Expense` is the ledger entry that justifies a balance debit. The
//! processor inserts it in the same transaction as the debit; one is never
//! persisted without the other.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityStatus, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: String,
    pub bank_account_id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
    /// Set when the row was materialized from a recurring obligation.
    pub fixed_expense_id: Option<Uuid>,
    pub status: EntityStatus,
}

impl Expense {
    pub fn new(
        user_id: String,
        bank_account_id: Uuid,
        category_id: Uuid,
        description: String,
        amount_minor: i64,
        date: NaiveDate,
        fixed_expense_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            bank_account_id,
            category_id,
            description,
            amount_minor,
            date,
            fixed_expense_id,
            status: EntityStatus::Active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub bank_account_id: String,
    pub category_id: String,
    pub description: String,
    pub amount_minor: i64,
    pub date: Date,
    pub fixed_expense_id: Option<String>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    BankAccounts,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            bank_account_id: ActiveValue::Set(expense.bank_account_id.to_string()),
            category_id: ActiveValue::Set(expense.category_id.to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            date: ActiveValue::Set(expense.date),
            fixed_expense_id: ActiveValue::Set(
                expense.fixed_expense_id.map(|id| id.to_string()),
            ),
            status: ActiveValue::Set(expense.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            user_id: model.user_id,
            bank_account_id: parse_uuid(&model.bank_account_id, "bank account")?,
            category_id: parse_uuid(&model.category_id, "category")?,
            description: model.description,
            amount_minor: model.amount_minor,
            date: model.date,
            fixed_expense_id: model
                .fixed_expense_id
                .as_deref()
                .map(|id| parse_uuid(id, "fixed expense"))
                .transpose()?,
            status: EntityStatus::try_from(model.status.as_str())?,
        })
    }
}
