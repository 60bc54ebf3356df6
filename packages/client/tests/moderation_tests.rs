//! Client tests against a loopback stub server that counts requests.

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use mealboard_client::{MealboardClient, ModerationDecision, RecordingNotifier};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Clone, Default)]
struct Stub {
    review_queue: Arc<Mutex<Vec<Value>>>,
    alias_queue: Arc<Mutex<Vec<Value>>>,
    review_gets: Arc<AtomicUsize>,
    alias_gets: Arc<AtomicUsize>,
    review_puts: Arc<Mutex<Vec<String>>>,
    alias_puts: Arc<Mutex<Vec<String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

fn queued_review(id: i64, item_name: &str) -> Value {
    json!({
        "id": id,
        "status": "AWAITING_REVIEW",
        "itemsStars": 4,
        "reviewerComments": "Pretty good.",
        "dateItemServed": "2025-03-01",
        "item": {
            "id": 100 + id,
            "name": item_name,
            "station": "Entrees",
            "diningCommonsCode": "ortega"
        },
        "reviewerEmail": "diner@example.edu",
        "reviewerAlias": null
    })
}

fn queued_alias(id: i64, proposed: &str) -> Value {
    json!({
        "id": id,
        "userId": 300 + id,
        "email": "diner@example.edu",
        "alias": null,
        "proposedAlias": proposed,
        "status": "AWAITING_REVIEW",
        "createdAt": "2025-03-01T12:00:00Z"
    })
}

fn remove_by_query_id(rows: &mut Vec<Value>, query: &str) {
    let id = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("id="))
        .and_then(|v| v.parse::<i64>().ok());
    if let Some(id) = id {
        rows.retain(|row| row["id"].as_i64() != Some(id));
    }
}

async fn review_queue_handler(State(stub): State<Stub>) -> impl IntoResponse {
    stub.review_gets.fetch_add(1, Ordering::SeqCst);
    if stub.fail_reads.load(Ordering::SeqCst) {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "role MODERATOR required" })));
    }
    let rows = stub.review_queue.lock().unwrap().clone();
    (StatusCode::OK, Json(Value::Array(rows)))
}

async fn alias_queue_handler(State(stub): State<Stub>) -> impl IntoResponse {
    stub.alias_gets.fetch_add(1, Ordering::SeqCst);
    if stub.fail_reads.load(Ordering::SeqCst) {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "role MODERATOR required" })));
    }
    let rows = stub.alias_queue.lock().unwrap().clone();
    (StatusCode::OK, Json(Value::Array(rows)))
}

async fn moderate_review_handler(
    State(stub): State<Stub>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let query = query.unwrap_or_default();
    stub.review_puts.lock().unwrap().push(query.clone());
    if stub.fail_writes.load(Ordering::SeqCst) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "review has already been moderated (status REJECTED)" })),
        );
    }
    remove_by_query_id(&mut stub.review_queue.lock().unwrap(), &query);
    (
        StatusCode::OK,
        Json(json!({
            "id": 7,
            "itemId": 107,
            "reviewerId": 12,
            "itemsStars": 4,
            "reviewerComments": "Pretty good.",
            "dateItemServed": "2025-03-01",
            "status": "APPROVED",
            "moderatorComments": null,
            "moderatedBy": 1,
            "moderatedAt": "2025-03-02T08:00:00Z"
        })),
    )
}

async fn moderate_alias_handler(
    State(stub): State<Stub>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let query = query.unwrap_or_default();
    stub.alias_puts.lock().unwrap().push(query.clone());
    if stub.fail_writes.load(Ordering::SeqCst) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "alias \"SharedName\" is already taken" })),
        );
    }
    remove_by_query_id(&mut stub.alias_queue.lock().unwrap(), &query);
    (
        StatusCode::OK,
        Json(json!({
            "id": 9,
            "userId": 309,
            "proposedAlias": "HungryGaucho",
            "status": "REJECTED",
            "moderatedBy": 1,
            "moderatedAt": "2025-03-02T08:00:00Z"
        })),
    )
}

async fn start_stub(stub: Stub) -> SocketAddr {
    let app = Router::new()
        .route("/api/reviews/needsModeration", get(review_queue_handler))
        .route("/api/reviews/moderate", put(moderate_review_handler))
        .route("/api/admin/usersWithProposedAlias", get(alias_queue_handler))
        .route("/api/admin/updateAliasModeration", put(moderate_alias_handler))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client_for(stub: Stub) -> (MealboardClient, Arc<RecordingNotifier>) {
    let addr = start_stub(stub).await;
    let notifier = RecordingNotifier::new();
    let client = MealboardClient::builder()
        .base_url(Url::parse(&format!("http://{addr}")).unwrap())
        .token("test-token")
        .notifier(notifier.clone())
        .build();
    (client, notifier)
}

#[tokio::test]
async fn queue_fetches_reuse_the_cache_until_invalidated() {
    let stub = Stub::default();
    stub.review_queue
        .lock()
        .unwrap()
        .extend([queued_review(7, "Pesto Pasta"), queued_review(8, "Oatmeal")]);
    let gets = stub.review_gets.clone();
    let (client, _) = client_for(stub).await;

    let first = client.fetch_review_queue().await.unwrap();
    let second = client.fetch_review_queue().await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(gets.load(Ordering::SeqCst), 1);

    let decision = ModerationDecision::new(Some(7), Some(true)).unwrap();
    client.moderate_review(decision).await.unwrap();

    // Invalidated: the next fetch hits the server and the decided row is gone.
    let third = client.fetch_review_queue().await.unwrap();
    assert_eq!(gets.load(Ordering::SeqCst), 2);
    assert_eq!(third.len(), 1);
    assert!(third.iter().all(|r| r.id != 7));
}

#[tokio::test]
async fn approve_issues_exactly_one_put_with_the_expected_params() {
    let stub = Stub::default();
    let puts = stub.review_puts.clone();
    let (client, notifier) = client_for(stub).await;

    let decision = ModerationDecision::new(Some(7), Some(true))
        .unwrap()
        .with_subject("Pesto Pasta");
    let review = client.moderate_review(decision).await.unwrap();
    assert_eq!(review.status.as_str(), "APPROVED");

    let recorded = puts.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].contains("id=7"));
    assert!(recorded[0].contains("approved=true"));
    assert!(!recorded[0].contains("moderatorComments"));

    let successes = notifier.successes();
    assert_eq!(successes.len(), 1);
    assert!(successes[0].contains("Pesto Pasta"));
    assert!(successes[0].contains("approved"));
}

#[tokio::test]
async fn reject_issues_exactly_one_put_with_approved_false() {
    let stub = Stub::default();
    let puts = stub.alias_puts.clone();
    let (client, notifier) = client_for(stub).await;

    let decision = ModerationDecision::new(Some(9), Some(false))
        .unwrap()
        .with_subject("HungryGaucho");
    client.moderate_alias(decision).await.unwrap();

    let recorded = puts.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].contains("id=9"));
    assert!(recorded[0].contains("approved=false"));

    let successes = notifier.successes();
    assert!(successes[0].contains("HungryGaucho"));
    assert!(successes[0].contains("rejected"));
}

#[tokio::test]
async fn moderator_comments_are_forwarded_for_reviews() {
    let stub = Stub::default();
    let puts = stub.review_puts.clone();
    let (client, _) = client_for(stub).await;

    let decision = ModerationDecision::new(Some(7), Some(false))
        .unwrap()
        .with_moderator_comments("spam");
    client.moderate_review(decision).await.unwrap();

    let recorded = puts.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].contains("moderatorComments=spam"));
}

#[tokio::test]
async fn failed_write_notifies_with_gerund_and_keeps_the_cache() {
    let stub = Stub::default();
    stub.review_queue.lock().unwrap().push(queued_review(7, "Pesto Pasta"));
    stub.fail_writes.store(true, Ordering::SeqCst);
    let gets = stub.review_gets.clone();
    let puts = stub.review_puts.clone();
    let (client, notifier) = client_for(stub).await;

    client.fetch_review_queue().await.unwrap();
    assert_eq!(gets.load(Ordering::SeqCst), 1);

    let decision = ModerationDecision::new(Some(7), Some(false))
        .unwrap()
        .with_subject("Pesto Pasta");
    let err = client.moderate_review(decision).await.unwrap_err();
    assert!(err.to_string().contains("409"));

    // One attempt went out, nothing was retried.
    assert_eq!(puts.lock().unwrap().len(), 1);

    let errors = notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("rejecting"));
    assert!(errors[0].contains("Pesto Pasta"));
    assert!(errors[0].contains("already been moderated"));
    assert!(notifier.successes().is_empty());

    // The cache was not invalidated; the queue still serves locally.
    let queue = client.fetch_review_queue().await.unwrap();
    assert_eq!(gets.load(Ordering::SeqCst), 1);
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn incomplete_decisions_never_reach_the_wire() {
    let stub = Stub::default();
    let review_puts = stub.review_puts.clone();
    let alias_puts = stub.alias_puts.clone();
    let (_client, _) = client_for(stub).await;

    assert!(ModerationDecision::new(None, Some(true)).is_err());
    assert!(ModerationDecision::new(Some(7), None).is_err());
    assert!(ModerationDecision::new(None, None).is_err());

    assert!(review_puts.lock().unwrap().is_empty());
    assert!(alias_puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_queue_fetch_names_the_method_and_url() {
    let stub = Stub::default();
    stub.fail_reads.store(true, Ordering::SeqCst);
    let (client, notifier) = client_for(stub).await;

    let err = client.fetch_alias_queue().await.unwrap_err();
    assert!(err.to_string().contains("403"));

    let errors = notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("GET http://"));
    assert!(errors[0].contains("usersWithProposedAlias"));
}

#[tokio::test]
async fn review_writes_do_not_invalidate_the_alias_queue() {
    let stub = Stub::default();
    stub.alias_queue.lock().unwrap().push(queued_alias(9, "HungryGaucho"));
    let alias_gets = stub.alias_gets.clone();
    let (client, _) = client_for(stub).await;

    client.fetch_alias_queue().await.unwrap();
    let decision = ModerationDecision::new(Some(7), Some(true)).unwrap();
    client.moderate_review(decision).await.unwrap();

    // Still served from cache.
    let queue = client.fetch_alias_queue().await.unwrap();
    assert_eq!(alias_gets.load(Ordering::SeqCst), 1);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].proposed_alias, "HungryGaucho");
}
