//! Core engine for the recurring-obligation and balance-consistency logic.
//!
//! The engine owns every code path that mutates a bank account's balance:
//! materializing due fixed expenses into ledger rows and moving money between
//! two accounts. Both happen inside a single database transaction together
//! with the ledger row that justifies the change; there is no code path that
//! touches a balance without one.

pub use bank_accounts::BankAccount;
pub use error::EngineError;
pub use expenses::Expense;
pub use fixed_expenses::{FixedExpense, RecurrenceKind};
pub use ops::{Engine, EngineBuilder, ProcessReport};
pub use status::EntityStatus;
pub use transfers::Transfer;

pub mod recurrence;

mod bank_accounts;
mod categories;
mod error;
mod expenses;
mod fixed_expenses;
mod ops;
mod status;
mod transfers;
mod users;
mod util;

pub(crate) type ResultEngine<T> = Result<T, EngineError>;
