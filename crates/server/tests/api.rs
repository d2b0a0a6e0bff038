use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;
use server::{ServerState, router};

async fn test_router() -> Router {
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

    let engine = engine::Engine::builder().database(db.clone()).build();
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

fn request(method: &str, uri: &str, user: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(user, "password"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/bills")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/bills")
                .header(header::AUTHORIZATION, basic_auth("alice", "wrong"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bill_create_pay_and_rollover_via_api() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/bills",
            "alice",
            Some(json!({
                "name": "Rent",
                "amount_cents": 120_000,
                "due_date": "2026-01-31",
                "category": "Housing",
                "is_recurring": true,
                "frequency": "monthly",
                "reminders": [{"channel": "email", "days_before_due": 3}]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bill_id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/bills/{bill_id}"),
            "alice",
            Some(json!({"status": "paid", "payment_method": "bank_transfer"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["status"], "paid");
    let successor_id = updated["successor_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/bills/{successor_id}"),
            "alice",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let successor = json_body(response).await;
    assert_eq!(successor["status"], "pending");
    assert_eq!(successor["due_date"], "2026-02-28");
    assert_eq!(successor["reminders"][0]["sent"], false);
    assert_eq!(successor["history"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/bills/{bill_id}"), "alice", None))
        .await
        .unwrap();
    let paid = json_body(response).await;
    assert_eq!(paid["history"].as_array().unwrap().len(), 1);
    assert_eq!(paid["history"][0]["payment_method"], "bank_transfer");
}

#[tokio::test]
async fn foreign_bill_access_is_forbidden() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/bills",
            "alice",
            Some(json!({
                "name": "Water",
                "amount_cents": 4_500,
                "due_date": "2026-03-15",
                "category": "Utilities",
                "is_recurring": false
            })),
        ))
        .await
        .unwrap();
    let bill_id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/bills/{bill_id}"),
            "bob",
            Some(json!({"status": "paid"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn budget_conflict_and_summary_via_api() {
    let app = test_router().await;

    let budget = json!({
        "year": 2026,
        "month": 3,
        "total_cents": 200_000,
        "categories": [
            {"name": "Food", "limit_cents": 50_000},
            {"name": "Travel", "limit_cents": 30_000}
        ]
    });
    let response = app
        .clone()
        .oneshot(request("POST", "/budget", "alice", Some(budget.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same family, same month.
    let response = app
        .clone()
        .oneshot(request("POST", "/budget", "alice", Some(budget)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    for (category, amount, date) in [
        ("Food", 12_000, "2026-03-05"),
        ("Food", 3_000, "2026-03-20"),
        ("Gas", 4_000, "2026-03-12"),
    ] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/transactions",
                "alice",
                Some(json!({
                    "amount_cents": amount,
                    "kind": "expense",
                    "category": category,
                    "date": date
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/budget/summary/2026/3", "alice", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = json_body(response).await;
    assert_eq!(summary["categories"][0]["name"], "Food");
    assert_eq!(summary["categories"][0]["spent_cents"], 15_000);
    assert_eq!(summary["categories"][1]["spent_cents"], 0);
    assert_eq!(summary["total_spent_cents"], 19_000);

    let response = app
        .clone()
        .oneshot(request("GET", "/budget/summary/2026/4", "alice", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transactions_filter_by_query() {
    let app = test_router().await;

    for (category, date) in [("Food", "2026-03-01"), ("Gas", "2026-03-15")] {
        app.clone()
            .oneshot(request(
                "POST",
                "/transactions",
                "alice",
                Some(json!({
                    "amount_cents": 1_000,
                    "kind": "expense",
                    "category": category,
                    "date": date
                })),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/transactions?category=Food", "alice", None))
        .await
        .unwrap();
    let list = json_body(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["category"], "Food");

    // Transactions are family-scoped; bob is in another family.
    let response = app
        .clone()
        .oneshot(request("GET", "/transactions", "bob", None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn investment_portfolio_via_api() {
    let app = test_router().await;

    for (symbol, current_price) in [("WIN", 12_000), ("LOSE", 9_000)] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/investments",
                "alice",
                Some(json!({
                    "kind": "stocks",
                    "symbol": symbol,
                    "name": format!("{symbol} Corp"),
                    "quantity": 10.0,
                    "purchase_price_cents": 10_000,
                    "purchase_date": "2025-06-01",
                    "current_price_cents": current_price
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/investments/portfolio", "alice", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let portfolio = json_body(response).await;
    assert_eq!(portfolio["total_cost_cents"], 200_000);
    assert_eq!(portfolio["total_value_cents"], 210_000);
    assert_eq!(portfolio["total_return_percentage"], 5.0);
    assert_eq!(portfolio["by_kind"]["stocks"]["count"], 2);
    assert_eq!(portfolio["top_performers"][0]["symbol"], "WIN");
    assert_eq!(portfolio["worst_performers"][0]["symbol"], "LOSE");
}

#[tokio::test]
async fn investment_history_grows_with_quantity_changes() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/investments",
            "alice",
            Some(json!({
                "kind": "etfs",
                "symbol": "IDX",
                "name": "Index Fund",
                "quantity": 10.0,
                "purchase_price_cents": 10_000,
                "purchase_date": "2025-06-01"
            })),
        ))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(request(
            "PUT",
            &format!("/investments/{id}"),
            "alice",
            Some(json!({"quantity": 15.0, "current_price_cents": 12_000})),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/investments/{id}/history"),
            "alice",
            None,
        ))
        .await
        .unwrap();
    let trades = json_body(response).await;
    assert_eq!(trades.as_array().unwrap().len(), 2);
    assert_eq!(trades[0]["action"], "buy");
    assert_eq!(trades[1]["action"], "buy");
    assert_eq!(trades[1]["quantity"], 5.0);
}

#[tokio::test]
async fn bank_account_lifecycle_via_api() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/accounts",
            "alice",
            Some(json!({
                "bank_name": "First Bank",
                "kind": "checking",
                "account_number": "000123",
                "balance_cents": 50_000
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/accounts/{id}"),
            "alice",
            Some(json!({"balance_cents": 42_000, "is_active": false})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let account = json_body(response).await;
    assert_eq!(account["balance_cents"], 42_000);
    assert_eq!(account["is_active"], false);
    assert_eq!(account["currency"], "USD");

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/accounts/{id}"), "alice", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request("GET", "/accounts", "alice", None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn reminder_without_mail_config_is_unavailable() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/bills",
            "alice",
            Some(json!({
                "name": "Rent",
                "amount_cents": 120_000,
                "due_date": "2026-01-31",
                "category": "Housing",
                "is_recurring": false
            })),
        ))
        .await
        .unwrap();
    let bill_id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/bills/{bill_id}/remind"),
            "alice",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
