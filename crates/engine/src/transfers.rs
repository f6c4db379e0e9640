//! Transfer primitives.
//!
//! A `Transfer` moves a sum between two accounts of the same user. While
//! `status = active` the net effect on the pair is exactly `-amount` /
//! `+amount`; soft-deleting the row reverses that effect atomically.
//! Amount and account ids are immutable after creation: changing them would
//! require re-running the balance algebra, so an amount change is modeled as
//! delete + recreate.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityStatus, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub id: Uuid,
    pub user_id: String,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    pub fn new(
        user_id: String,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount_minor: i64,
        date: NaiveDate,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if from_account_id == to_account_id {
            return Err(EngineError::InvalidAmount(
                "from_account_id and to_account_id must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            from_account_id,
            to_account_id,
            amount_minor,
            date,
            description,
            status: EntityStatus::Active,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount_minor: i64,
    pub date: Date,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transfer> for ActiveModel {
    fn from(transfer: &Transfer) -> Self {
        Self {
            id: ActiveValue::Set(transfer.id.to_string()),
            user_id: ActiveValue::Set(transfer.user_id.clone()),
            from_account_id: ActiveValue::Set(transfer.from_account_id.to_string()),
            to_account_id: ActiveValue::Set(transfer.to_account_id.to_string()),
            amount_minor: ActiveValue::Set(transfer.amount_minor),
            date: ActiveValue::Set(transfer.date),
            description: ActiveValue::Set(transfer.description.clone()),
            status: ActiveValue::Set(transfer.status.as_str().to_string()),
            created_at: ActiveValue::Set(transfer.created_at),
        }
    }
}

impl TryFrom<Model> for Transfer {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "transfer")?,
            user_id: model.user_id,
            from_account_id: parse_uuid(&model.from_account_id, "bank account")?,
            to_account_id: parse_uuid(&model.to_account_id, "bank account")?,
            amount_minor: model.amount_minor,
            date: model.date,
            description: model.description,
            status: EntityStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
