//! Recurring obligation primitives.
//!
//! A `FixedExpense` is a user-defined recurring payment (rent, subscription)
//! with a schedule anchored on `due_date`. The processor materializes each
//! occurrence into an expense row and advances `next_due_date`; that column
//! is monotonically non-decreasing across successful runs.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityStatus, ResultEngine, util::parse_uuid};

/// How often an obligation recurs.
///
/// Unknown kinds are a hard error at every parse boundary; there is no silent
/// fallback to monthly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecurrenceKind {
    Monthly,
    Yearly,
}

impl RecurrenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for RecurrenceKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidRecurrence(format!(
                "invalid recurrence kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedExpense {
    pub id: Uuid,
    pub user_id: String,
    pub bank_account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub amount_minor: i64,
    /// Anchor date: its day-of-month (and month, for yearly obligations)
    /// drives every occurrence.
    pub due_date: NaiveDate,
    pub is_recurring: bool,
    pub recurrence: RecurrenceKind,
    /// The next occurrence the processor will pick up.
    pub next_due_date: NaiveDate,
    pub last_processed_at: Option<DateTime<Utc>>,
    pub status: EntityStatus,
}

impl FixedExpense {
    pub fn new(
        user_id: String,
        bank_account_id: Uuid,
        category_id: Option<Uuid>,
        name: String,
        amount_minor: i64,
        due_date: NaiveDate,
        recurrence: RecurrenceKind,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            bank_account_id,
            category_id,
            name,
            amount_minor,
            due_date,
            is_recurring: true,
            recurrence,
            next_due_date: due_date,
            last_processed_at: None,
            status: EntityStatus::Active,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fixed_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub bank_account_id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub amount_minor: i64,
    pub due_date: Date,
    pub is_recurring: bool,
    pub recurrence: String,
    pub next_due_date: Date,
    pub last_processed_at: Option<DateTimeUtc>,
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

impl From<&FixedExpense> for ActiveModel {
    fn from(fixed: &FixedExpense) -> Self {
        Self {
            id: ActiveValue::Set(fixed.id.to_string()),
            user_id: ActiveValue::Set(fixed.user_id.clone()),
            bank_account_id: ActiveValue::Set(fixed.bank_account_id.to_string()),
            category_id: ActiveValue::Set(fixed.category_id.map(|id| id.to_string())),
            name: ActiveValue::Set(fixed.name.clone()),
            amount_minor: ActiveValue::Set(fixed.amount_minor),
            due_date: ActiveValue::Set(fixed.due_date),
            is_recurring: ActiveValue::Set(fixed.is_recurring),
            recurrence: ActiveValue::Set(fixed.recurrence.as_str().to_string()),
            next_due_date: ActiveValue::Set(fixed.next_due_date),
            last_processed_at: ActiveValue::Set(fixed.last_processed_at),
            status: ActiveValue::Set(fixed.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for FixedExpense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "fixed expense")?,
            user_id: model.user_id,
            bank_account_id: parse_uuid(&model.bank_account_id, "bank account")?,
            category_id: model
                .category_id
                .as_deref()
                .map(|id| parse_uuid(id, "category"))
                .transpose()?,
            name: model.name,
            amount_minor: model.amount_minor,
            due_date: model.due_date,
            is_recurring: model.is_recurring,
            recurrence: RecurrenceKind::try_from(model.recurrence.as_str())?,
            next_due_date: model.next_due_date,
            last_processed_at: model.last_processed_at,
            status: EntityStatus::try_from(model.status.as_str())?,
        })
    }
}
