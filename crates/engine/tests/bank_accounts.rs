use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{AccountKind, BankAccountDraft, BankAccountUpdate, Engine, EngineError};
use migration::MigratorTrait;

async fn engine_with_users() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (username, family_id) in [("alice", "family-a"), ("bob", "family-b")] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password, email, family_id) VALUES (?, ?, ?, ?)",
            vec![
                username.into(),
                "password".into(),
                format!("{username}@example.com").into(),
                family_id.into(),
            ],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn checking_draft(bank_name: &str) -> BankAccountDraft {
    BankAccountDraft {
        bank_name: bank_name.to_string(),
        kind: AccountKind::Checking,
        account_number: "000123".to_string(),
        balance_cents: 50_000,
        currency: None,
    }
}

#[tokio::test]
async fn create_defaults_currency_and_active() {
    let (engine, _db) = engine_with_users().await;
    engine
        .create_bank_account("alice", "family-a", checking_draft("First Bank"), Utc::now())
        .await
        .unwrap();

    let accounts = engine.list_bank_accounts("alice").await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].currency, "USD");
    assert!(accounts[0].is_active);
}

#[tokio::test]
async fn update_bumps_last_sync() {
    let (engine, _db) = engine_with_users().await;
    let created_at = Utc::now();
    let id = engine
        .create_bank_account("alice", "family-a", checking_draft("First Bank"), created_at)
        .await
        .unwrap();

    let later = created_at + chrono::Duration::hours(1);
    let account = engine
        .update_bank_account(
            id,
            "alice",
            BankAccountUpdate {
                balance_cents: Some(42_000),
                is_active: Some(false),
                ..Default::default()
            },
            later,
        )
        .await
        .unwrap();

    assert_eq!(account.balance_cents, 42_000);
    assert!(!account.is_active);
    assert_eq!(account.last_sync, later);
}

#[tokio::test]
async fn accounts_are_scoped_to_their_owner() {
    let (engine, _db) = engine_with_users().await;
    let id = engine
        .create_bank_account("alice", "family-a", checking_draft("First Bank"), Utc::now())
        .await
        .unwrap();

    assert!(engine.list_bank_accounts("bob").await.unwrap().is_empty());
    let err = engine
        .delete_bank_account(id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    engine.delete_bank_account(id, "alice").await.unwrap();
    assert!(engine.list_bank_accounts("alice").await.unwrap().is_empty());
}
