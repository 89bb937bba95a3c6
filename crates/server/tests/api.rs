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
use uuid::Uuid;

use migration::MigratorTrait;

async fn test_app() -> Router {
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
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::app(engine, db)
}

fn credentials(user: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {encoded}")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, credentials("alice", "password"));
    let request = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder.body(Body::from(body.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn new_wallet(app: &Router, name: &str, balance_minor: i64) -> Uuid {
    let (status, body) = send(
        app,
        "POST",
        "/wallets",
        Some(json!({ "name": name, "balance_minor": balance_minor })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

async fn wallet_balance(app: &Router, wallet_id: Uuid) -> i64 {
    let (status, body) = send(app, "GET", &format!("/wallets/{wallet_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["balance_minor"].as_i64().unwrap()
}

#[tokio::test]
async fn rejects_wrong_credentials() {
    let app = test_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/wallets")
        .header(header::AUTHORIZATION, credentials("alice", "wrong"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wallet_lifecycle() {
    let app = test_app().await;
    let wallet_id = new_wallet(&app, "Cash", 100_000).await;

    let (status, body) = send(&app, "GET", "/wallets", None).await;
    assert_eq!(status, StatusCode::OK);
    let wallets = body["wallets"].as_array().unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0]["name"], "Cash");
    assert_eq!(wallets[0]["balance_minor"], 100_000);

    // Same name, different case.
    let (status, _) = send(
        &app,
        "POST",
        "/wallets",
        Some(json!({ "name": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", &format!("/wallets/{wallet_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/wallets/{wallet_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_evaluates_free_text_amount() {
    let app = test_app().await;
    let wallet_id = new_wallet(&app, "Cash", 100_000).await;

    let (status, body) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "wallet_id": wallet_id,
            "kind": "expense",
            "amount": "20000+5000",
            "category": "Food",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());

    assert_eq!(wallet_balance(&app, wallet_id).await, 75_000);

    let (status, body) = send(
        &app,
        "GET",
        "/transactions",
        Some(json!({ "wallet_id": wallet_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["amount_minor"], 25_000);
    assert_eq!(transactions[0]["kind"], "expense");
}

#[tokio::test]
async fn create_with_unparseable_amount_is_rejected() {
    let app = test_app().await;
    let wallet_id = new_wallet(&app, "Cash", 100_000).await;

    // "abc" evaluates to zero, which is not a valid amount.
    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "wallet_id": wallet_id,
            "kind": "expense",
            "amount": "abc",
            "category": "Food",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(wallet_balance(&app, wallet_id).await, 100_000);
}

#[tokio::test]
async fn transfer_category_is_reserved() {
    let app = test_app().await;
    let wallet_id = new_wallet(&app, "Cash", 50_000).await;

    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "wallet_id": wallet_id,
            "kind": "expense",
            "amount": "10000",
            "category": "Transfer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(wallet_balance(&app, wallet_id).await, 50_000);
}

#[tokio::test]
async fn update_and_delete_adjust_the_balance() {
    let app = test_app().await;
    let wallet_id = new_wallet(&app, "Cash", 100_000).await;

    let (_, body) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "wallet_id": wallet_id,
            "kind": "expense",
            "amount": "30000",
            "category": "Food",
        })),
    )
    .await;
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/transactions/{id}"),
        Some(json!({ "amount": "10000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallet_balance(&app, wallet_id).await, 90_000);

    let (status, _) = send(&app, "DELETE", &format!("/transactions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(wallet_balance(&app, wallet_id).await, 100_000);

    let (status, _) = send(&app, "DELETE", &format!("/transactions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transfer_moves_money_and_locks_its_rows() {
    let app = test_app().await;
    let from = new_wallet(&app, "Bank", 80_000).await;
    let to = new_wallet(&app, "Cash", 5_000).await;

    let (status, body) = send(
        &app,
        "POST",
        "/transfer",
        Some(json!({
            "from_wallet_id": from,
            "to_wallet_id": to,
            "amount": "30000",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(wallet_balance(&app, from).await, 50_000);
    assert_eq!(wallet_balance(&app, to).await, 35_000);

    let expense_id = body["expense_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/transactions/{expense_id}"),
        Some(json!({ "amount": "10000" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "DELETE", &format!("/transactions/{expense_id}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // The wallet with rows cannot be deleted.
    let (status, _) = send(&app, "DELETE", &format!("/wallets/{from}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn overdraft_check_is_advisory() {
    let app = test_app().await;
    let wallet_id = new_wallet(&app, "Cash", 10_000).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/wallets/{wallet_id}/overdraft"),
        Some(json!({ "amount_minor": 25_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["would_go_negative"], true);

    // The expense itself still goes through.
    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "wallet_id": wallet_id,
            "kind": "expense",
            "amount": "25000",
            "category": "Rent",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(wallet_balance(&app, wallet_id).await, -15_000);
}

#[tokio::test]
async fn unknown_wallet_is_not_found() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "wallet_id": Uuid::new_v4(),
            "kind": "income",
            "amount": "100",
            "category": "Misc",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
