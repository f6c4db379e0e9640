use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, EntityStatus};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn transfer_moves_funds_and_conserves_total() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 5_000)
        .await
        .unwrap();

    engine
        .create_transfer("alice", from, to, 3_000, Some("top-up"), date(2026, 3, 1))
        .await
        .unwrap();

    let from_account = engine.bank_account(from, "alice").await.unwrap();
    let to_account = engine.bank_account(to, "alice").await.unwrap();
    assert_eq!(from_account.balance_minor, 7_000);
    assert_eq!(to_account.balance_minor, 8_000);
    assert_eq!(
        from_account.balance_minor + to_account.balance_minor,
        15_000
    );
}

#[tokio::test]
async fn insufficient_funds_leaves_balances_untouched() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 1_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();

    let err = engine
        .create_transfer("alice", from, to, 2_000, None, date(2026, 3, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let from_account = engine.bank_account(from, "alice").await.unwrap();
    let to_account = engine.bank_account(to, "alice").await.unwrap();
    assert_eq!(from_account.balance_minor, 1_000);
    assert_eq!(to_account.balance_minor, 0);

    // Nothing was recorded either.
    let transfers = engine.list_transfers("alice", true).await.unwrap();
    assert!(transfers.is_empty());
}

#[tokio::test]
async fn self_transfer_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .new_bank_account("alice", "Checking", 1_000)
        .await
        .unwrap();

    let err = engine
        .create_transfer("alice", account, account, 100, None, date(2026, 3, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 1_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();

    for amount in [0, -500] {
        let err = engine
            .create_transfer("alice", from, to, amount, None, date(2026, 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}

#[tokio::test]
async fn delete_reverses_balances_exactly() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 5_000)
        .await
        .unwrap();

    let transfer = engine
        .create_transfer("alice", from, to, 3_000, None, date(2026, 3, 1))
        .await
        .unwrap();
    engine.delete_transfer("alice", transfer.id).await.unwrap();

    let from_account = engine.bank_account(from, "alice").await.unwrap();
    let to_account = engine.bank_account(to, "alice").await.unwrap();
    assert_eq!(from_account.balance_minor, 10_000);
    assert_eq!(to_account.balance_minor, 5_000);

    let deleted = engine.transfer("alice", transfer.id).await.unwrap();
    assert_eq!(deleted.status, EntityStatus::Deleted);
}

#[tokio::test]
async fn delete_rejected_when_destination_spent_the_funds() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();
    let elsewhere = engine
        .new_bank_account("alice", "Brokerage", 0)
        .await
        .unwrap();

    let transfer = engine
        .create_transfer("alice", from, to, 3_000, None, date(2026, 3, 1))
        .await
        .unwrap();
    // Destination spends most of what it received.
    engine
        .create_transfer("alice", to, elsewhere, 2_500, None, date(2026, 3, 2))
        .await
        .unwrap();

    let err = engine
        .delete_transfer("alice", transfer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    // Rejection left everything as it was.
    let to_account = engine.bank_account(to, "alice").await.unwrap();
    assert_eq!(to_account.balance_minor, 500);
    let unchanged = engine.transfer("alice", transfer.id).await.unwrap();
    assert_eq!(unchanged.status, EntityStatus::Active);
}

#[tokio::test]
async fn delete_twice_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();

    let transfer = engine
        .create_transfer("alice", from, to, 3_000, None, date(2026, 3, 1))
        .await
        .unwrap();
    engine.delete_transfer("alice", transfer.id).await.unwrap();

    let err = engine
        .delete_transfer("alice", transfer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // The reversal was applied exactly once.
    let from_account = engine.bank_account(from, "alice").await.unwrap();
    assert_eq!(from_account.balance_minor, 10_000);
}

#[tokio::test]
async fn update_changes_only_description_and_date() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();

    let transfer = engine
        .create_transfer("alice", from, to, 3_000, Some("initial"), date(2026, 3, 1))
        .await
        .unwrap();

    let updated = engine
        .update_transfer("alice", transfer.id, Some("corrected"), Some(date(2026, 3, 5)))
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("corrected"));
    assert_eq!(updated.date, date(2026, 3, 5));
    assert_eq!(updated.amount_minor, 3_000);
    assert_eq!(updated.from_account_id, from);
    assert_eq!(updated.to_account_id, to);

    // Balances did not move.
    let from_account = engine.bank_account(from, "alice").await.unwrap();
    assert_eq!(from_account.balance_minor, 7_000);
}

#[tokio::test]
async fn list_excludes_deleted_by_default() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();

    let kept = engine
        .create_transfer("alice", from, to, 1_000, None, date(2026, 3, 1))
        .await
        .unwrap();
    let removed = engine
        .create_transfer("alice", from, to, 2_000, None, date(2026, 3, 2))
        .await
        .unwrap();
    engine.delete_transfer("alice", removed.id).await.unwrap();

    let visible = engine.list_transfers("alice", false).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, kept.id);

    let all = engine.list_transfers("alice", true).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn transfers_are_scoped_to_their_owner() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();
    let transfer = engine
        .create_transfer("alice", from, to, 1_000, None, date(2026, 3, 1))
        .await
        .unwrap();

    let err = engine.transfer("bob", transfer.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.delete_transfer("bob", transfer.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn duplicate_account_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_bank_account("alice", "Checking", 0)
        .await
        .unwrap();
    let err = engine
        .new_bank_account("alice", "checking", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn suspended_account_cannot_send_or_receive() {
    let (engine, _db) = engine_with_db().await;

    let from = engine
        .new_bank_account("alice", "Checking", 10_000)
        .await
        .unwrap();
    let to = engine
        .new_bank_account("alice", "Savings", 0)
        .await
        .unwrap();
    engine
        .set_account_status(to, "alice", EntityStatus::Suspended)
        .await
        .unwrap();

    let err = engine
        .create_transfer("alice", from, to, 1_000, None, date(2026, 3, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let from_account = engine.bank_account(from, "alice").await.unwrap();
    assert_eq!(from_account.balance_minor, 10_000);
}
