//! Request/response payloads shared by the server and its clients.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a persisted entity, as seen on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    #[default]
    Active,
    Suspended,
    Archived,
    Deleted,
    Locked,
    Pending,
}

/// Recurrence schedule of a fixed expense.
///
/// Unknown values are rejected at deserialization; there is no fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Monthly,
    Yearly,
}

pub mod account {
    use uuid::Uuid;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        /// Opening balance in minor units (cents).
        pub opening_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub balance_minor: i64,
        pub status: EntityStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Created {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountStatusUpdate {
        pub status: EntityStatus,
    }
}

pub mod transfer {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_account_id: Uuid,
        pub to_account_id: Uuid,
        /// Amount in minor units (cents); must be > 0.
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub description: Option<String>,
    }

    /// Partial update: only description and date are mutable.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferUpdate {
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferView {
        pub id: Uuid,
        pub from_account_id: Uuid,
        pub to_account_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub status: EntityStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferListResponse {
        pub transfers: Vec<TransferView>,
    }
}

pub mod fixed_expense {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FixedExpenseNew {
        pub bank_account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub name: String,
        pub amount_minor: i64,
        /// Anchor date for the schedule (day-of-month, and month for yearly).
        pub due_date: NaiveDate,
        pub recurrence: RecurrenceKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProcessResponse {
        pub examined: usize,
        pub processed: usize,
        pub skipped: usize,
    }

    /// Schedule preview: does the obligation apply in `(year, month)`?
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OccurrenceQuery {
        pub year: i32,
        pub month: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OccurrenceResponse {
        pub date: Option<NaiveDate>,
    }
}
