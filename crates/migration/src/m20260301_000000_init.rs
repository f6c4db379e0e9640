//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication
//! - `categories`: expense classification
//! - `bank_accounts`: balances, the engine's shared mutable resource
//! - `fixed_expenses`: recurring obligations with their schedule
//! - `expenses`: materialized ledger entries
//! - `transfers`: two-account atomic balance movements

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Status,
}

#[derive(Iden)]
enum BankAccounts {
    Table,
    Id,
    UserId,
    Name,
    BalanceMinor,
    Status,
}

#[derive(Iden)]
enum FixedExpenses {
    Table,
    Id,
    UserId,
    BankAccountId,
    CategoryId,
    Name,
    AmountMinor,
    DueDate,
    IsRecurring,
    Recurrence,
    NextDueDate,
    LastProcessedAt,
    Status,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    UserId,
    BankAccountId,
    CategoryId,
    Description,
    AmountMinor,
    Date,
    FixedExpenseId,
    Status,
}

#[derive(Iden)]
enum Transfers {
    Table,
    Id,
    UserId,
    FromAccountId,
    ToAccountId,
    AmountMinor,
    Date,
    Description,
    Status,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).string().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id-name-unique")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Bank Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAccounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankAccounts::UserId).string().not_null())
                    .col(ColumnDef::new(BankAccounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(BankAccounts::BalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankAccounts::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_accounts-user_id")
                            .from(BankAccounts::Table, BankAccounts::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bank_accounts-user_id-name-unique")
                    .table(BankAccounts::Table)
                    .col(BankAccounts::UserId)
                    .col(BankAccounts::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Fixed Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FixedExpenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FixedExpenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FixedExpenses::UserId).string().not_null())
                    .col(
                        ColumnDef::new(FixedExpenses::BankAccountId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FixedExpenses::CategoryId).string())
                    .col(ColumnDef::new(FixedExpenses::Name).string().not_null())
                    .col(
                        ColumnDef::new(FixedExpenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FixedExpenses::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(FixedExpenses::IsRecurring)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FixedExpenses::Recurrence).string().not_null())
                    .col(
                        ColumnDef::new(FixedExpenses::NextDueDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FixedExpenses::LastProcessedAt).timestamp())
                    .col(
                        ColumnDef::new(FixedExpenses::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fixed_expenses-bank_account_id")
                            .from(FixedExpenses::Table, FixedExpenses::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fixed_expenses-category_id")
                            .from(FixedExpenses::Table, FixedExpenses::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fixed_expenses-next_due_date-status")
                    .table(FixedExpenses::Table)
                    .col(FixedExpenses::NextDueDate)
                    .col(FixedExpenses::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::UserId).string().not_null())
                    .col(ColumnDef::new(Expenses::BankAccountId).string().not_null())
                    .col(ColumnDef::new(Expenses::CategoryId).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::FixedExpenseId).string())
                    .col(
                        ColumnDef::new(Expenses::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-bank_account_id")
                            .from(Expenses::Table, Expenses::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-category_id")
                            .from(Expenses::Table, Expenses::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-fixed_expense_id")
                            .from(Expenses::Table, Expenses::FixedExpenseId)
                            .to(FixedExpenses::Table, FixedExpenses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-bank_account_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::BankAccountId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Transfers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transfers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transfers::UserId).string().not_null())
                    .col(ColumnDef::new(Transfers::FromAccountId).string().not_null())
                    .col(ColumnDef::new(Transfers::ToAccountId).string().not_null())
                    .col(
                        ColumnDef::new(Transfers::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transfers::Date).date().not_null())
                    .col(ColumnDef::new(Transfers::Description).string())
                    .col(
                        ColumnDef::new(Transfers::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Transfers::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfers-from_account_id")
                            .from(Transfers::Table, Transfers::FromAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfers-to_account_id")
                            .from(Transfers::Table, Transfers::ToAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transfers-user_id-created_at")
                    .table(Transfers::Table)
                    .col(Transfers::UserId)
                    .col(Transfers::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FixedExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
