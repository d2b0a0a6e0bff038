use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, HistoryAction, InvestmentDraft, InvestmentKind, InvestmentUpdate,
    PriceQuotes, ResultEngine,
};
use migration::MigratorTrait;

struct FixedQuotes(i64);

#[async_trait::async_trait]
impl PriceQuotes for FixedQuotes {
    async fn quote(&self, _symbol: &str) -> ResultEngine<i64> {
        Ok(self.0)
    }
}

struct FailingQuotes;

#[async_trait::async_trait]
impl PriceQuotes for FailingQuotes {
    async fn quote(&self, symbol: &str) -> ResultEngine<i64> {
        Err(EngineError::Unavailable(format!("no quote for {symbol}")))
    }
}

async fn engine_with_users(quotes: Option<Arc<dyn PriceQuotes>>) -> (Engine, DatabaseConnection) {
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
    let mut builder = Engine::builder().database(db.clone());
    if let Some(quotes) = quotes {
        builder = builder.quotes(quotes);
    }
    (builder.build(), db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stock_draft(symbol: &str, quantity: f64, purchase_price_cents: i64) -> InvestmentDraft {
    InvestmentDraft {
        kind: InvestmentKind::Stocks,
        symbol: symbol.to_string(),
        name: format!("{symbol} Corp"),
        quantity,
        purchase_price_cents,
        purchase_date: date(2025, 6, 1),
        current_price_cents: Some(purchase_price_cents),
        notes: None,
    }
}

#[tokio::test]
async fn create_seeds_an_opening_buy() {
    let (engine, _db) = engine_with_users(None).await;
    let id = engine
        .create_investment("alice", "family-a", stock_draft("ACME", 10.0, 10_000), Utc::now())
        .await
        .unwrap();

    let trades = engine.investment_trades(id, "alice").await.unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].action, HistoryAction::Buy);
    assert_eq!(trades[0].quantity, 10.0);
    assert_eq!(trades[0].amount_cents, 100_000);
    assert_eq!(trades[0].date, date(2025, 6, 1));
}

#[tokio::test]
async fn quantity_changes_append_trades() {
    let (engine, _db) = engine_with_users(None).await;
    let id = engine
        .create_investment("alice", "family-a", stock_draft("ACME", 10.0, 10_000), Utc::now())
        .await
        .unwrap();

    // Buy 5 more at the new price.
    engine
        .update_investment(
            id,
            "alice",
            InvestmentUpdate {
                quantity: Some(15.0),
                current_price_cents: Some(12_000),
                ..Default::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    // Sell 3.
    engine
        .update_investment(
            id,
            "alice",
            InvestmentUpdate {
                quantity: Some(12.0),
                ..Default::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    // Price-only change appends nothing.
    engine
        .update_investment(
            id,
            "alice",
            InvestmentUpdate {
                current_price_cents: Some(13_000),
                ..Default::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();

    let trades = engine.investment_trades(id, "alice").await.unwrap();
    assert_eq!(trades.len(), 3);
    assert_eq!(trades[1].action, HistoryAction::Buy);
    assert_eq!(trades[1].quantity, 5.0);
    assert_eq!(trades[1].amount_cents, 60_000);
    assert_eq!(trades[2].action, HistoryAction::Sell);
    assert_eq!(trades[2].quantity, 3.0);
}

#[tokio::test]
async fn price_only_change_updates_price_without_a_trade() {
    let (engine, _db) = engine_with_users(None).await;
    let id = engine
        .create_investment("alice", "family-a", stock_draft("ACME", 10.0, 10_000), Utc::now())
        .await
        .unwrap();

    let investment = engine
        .update_investment(
            id,
            "alice",
            InvestmentUpdate {
                current_price_cents: Some(12_000),
                ..Default::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(investment.current_price_cents, 12_000);

    // Only the opening buy: the history records trades, not repricings.
    let trades = engine.investment_trades(id, "alice").await.unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].action, HistoryAction::Buy);
}

#[tokio::test]
async fn listing_refreshes_quoted_kinds_and_survives_failures() {
    let (engine, _db) = engine_with_users(Some(Arc::new(FixedQuotes(15_000)))).await;
    engine
        .create_investment("alice", "family-a", stock_draft("ACME", 10.0, 10_000), Utc::now())
        .await
        .unwrap();
    let mut crypto = stock_draft("BTC", 1.0, 500_000);
    crypto.kind = InvestmentKind::Crypto;
    engine
        .create_investment("alice", "family-a", crypto, Utc::now())
        .await
        .unwrap();

    let positions = engine.list_investments("alice", Utc::now()).await.unwrap();
    let acme = positions.iter().find(|p| p.symbol == "ACME").unwrap();
    let btc = positions.iter().find(|p| p.symbol == "BTC").unwrap();
    assert_eq!(acme.current_price_cents, 15_000);
    // Crypto has no refreshable quote; the stored price stands.
    assert_eq!(btc.current_price_cents, 500_000);

    // The refreshed price is persisted.
    let positions = engine.list_investments("alice", Utc::now()).await.unwrap();
    assert_eq!(
        positions.iter().find(|p| p.symbol == "ACME").unwrap().current_price_cents,
        15_000
    );
}

#[tokio::test]
async fn failed_quotes_keep_stored_prices() {
    let (engine, _db) = engine_with_users(Some(Arc::new(FailingQuotes))).await;
    engine
        .create_investment("alice", "family-a", stock_draft("ACME", 10.0, 10_000), Utc::now())
        .await
        .unwrap();

    let positions = engine.list_investments("alice", Utc::now()).await.unwrap();
    assert_eq!(positions[0].current_price_cents, 10_000);
}

#[tokio::test]
async fn portfolio_summary_totals_and_rankings() {
    let (engine, _db) = engine_with_users(None).await;
    let mut winner = stock_draft("WIN", 10.0, 10_000);
    winner.current_price_cents = Some(12_000);
    let mut loser = stock_draft("LOSE", 10.0, 10_000);
    loser.current_price_cents = Some(9_000);
    engine
        .create_investment("alice", "family-a", winner, Utc::now())
        .await
        .unwrap();
    engine
        .create_investment("alice", "family-a", loser, Utc::now())
        .await
        .unwrap();
    // Another user's positions stay out of the summary.
    engine
        .create_investment("bob", "family-b", stock_draft("OTHER", 1.0, 1_000), Utc::now())
        .await
        .unwrap();

    let summary = engine.portfolio_summary("alice").await.unwrap();
    assert_eq!(summary.total_cost_cents, 200_000);
    assert_eq!(summary.total_value_cents, 210_000);
    assert_eq!(summary.total_return_cents, 10_000);
    assert_eq!(summary.total_return_percentage, Some(5.0));
    assert_eq!(summary.by_kind[&InvestmentKind::Stocks].count, 2);
    assert_eq!(summary.top_performers[0].symbol, "WIN");
    assert_eq!(summary.worst_performers[0].symbol, "LOSE");
}

#[tokio::test]
async fn delete_removes_position_and_trades() {
    let (engine, _db) = engine_with_users(None).await;
    let id = engine
        .create_investment("alice", "family-a", stock_draft("ACME", 10.0, 10_000), Utc::now())
        .await
        .unwrap();

    let err = engine.delete_investment(id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    engine.delete_investment(id, "alice").await.unwrap();
    let err = engine.investment_trades(id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
