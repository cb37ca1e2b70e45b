use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use trackbuddy_api::{create_router, ApiConfig, AppState};
use trackbuddy_core::{MemoryStore, NewJournal, Store};

const TOKEN_HEADER: &str = "trackbuddy-token";
const DAY_MS: i64 = 86_400_000;
const PAST_DAY: i64 = 1_700_000_000_000;

fn app() -> Router {
    app_with_store().0
}

/// Router plus a handle on its store, for seeding records the API cannot create directly.
fn app_with_store() -> (Router, MemoryStore) {
    let mut config = ApiConfig::with_secret("test-secret");
    config.bcrypt_cost = 4;
    let store = MemoryStore::new();
    let state = AppState::new(Arc::new(store.clone()), &config).unwrap();
    (create_router(state), store)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "password": "secret1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn create_habit(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/habits",
        Some(token),
        Some(json!({
            "name": "Read",
            "color": "#ff0000",
            "duration": 30,
            "frequency": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn journal_body() -> Value {
    json!({
        "mood": 4,
        "standout": "Shipped it",
        "wentWell": "Focus",
        "wentWrong": "Slept late",
        "betterNextTime": "Sleep earlier",
        "tags": ["work"]
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/habits", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing token");
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let tampered = format!("{}x", token);

    let (status, body) = send(&app, Method::GET, "/api/habits", Some(&tampered), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_bearer_prefix_accepted() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let bearer = format!("Bearer {}", token);

    let (status, _) = send(&app, Method::GET, "/api/habits", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_and_refresh() {
    let app = app();
    register(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "firstName": "Ada",
            "lastName": "Again",
            "email": "ada@example.com",
            "password": "secret1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This email already exists");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/api/auth", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_register_validates_payload() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "not-an-email",
            "password": "123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_habit_check_flow() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let habit = create_habit(&app, &token).await;

    let check = |day: i64| format!("/api/habits/{}/check?day={}", habit, day);

    let (status, body) = send(&app, Method::POST, &check(PAST_DAY), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Habit checked");

    let earlier = PAST_DAY - DAY_MS;
    let (status, _) = send(&app, Method::POST, &check(earlier), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, &check(PAST_DAY), Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Habit already checked");

    let uri = format!(
        "/api/habits/{}/repetitions?min={}&max={}",
        habit,
        earlier,
        PAST_DAY + DAY_MS
    );
    let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([earlier, PAST_DAY]));

    let (_, body) = send(&app, Method::GET, "/api/habits", Some(&token), None).await;
    assert_eq!(body[0]["newestRepetition"], PAST_DAY);

    let (status, body) = send(&app, Method::DELETE, &check(earlier), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Habit unchecked");

    let (status, _) = send(&app, Method::DELETE, &check(earlier), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, &format!("/api/habits/{}", habit), Some(&token), None)
        .await;
    assert_eq!(body["newestRepetition"], PAST_DAY);
    assert_eq!(body["name"], "Read");
}

#[tokio::test]
async fn test_check_rejects_future_and_missing_day() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let habit = create_habit(&app, &token).await;

    let future = (Utc::now() + Duration::days(2)).timestamp_millis();
    let uri = format!("/api/habits/{}/check?day={}", habit, future);
    let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot check for the future");

    let uri = format!("/api/habits/{}/check", habit);
    let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Timestamp not included");
}

#[tokio::test]
async fn test_invalid_range_rejected() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let habit = create_habit(&app, &token).await;

    for query in ["min=200&max=100", "min=100"] {
        let uri = format!("/api/habits/{}/repetitions?{}", habit, query);
        let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid time period");
    }
}

#[tokio::test]
async fn test_other_users_habit_forbidden() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;
    let habit = create_habit(&app, &owner).await;

    let uri = format!("/api/habits/{}/check?day={}", habit, PAST_DAY);
    let (status, body) = send(&app, Method::POST, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let uri = format!("/api/habits/{}", habit);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/habits/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_journal_rejected() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/journals",
        Some(&token),
        Some(journal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["wentWell"], "Focus");
    assert_eq!(body["isStarred"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/journals",
        Some(&token),
        Some(journal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Journal for today already exists");

    let uri = "/api/journals?tag=work";
    let (status, body) = send(&app, Method::GET, uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert!(body[0].get("wentWell").is_none());

    let uri = "/api/journals?month=13&year=2024";
    let (status, _) = send(&app, Method::GET, uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_tags_and_account_delete() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/profile",
        Some(&token),
        Some(json!({ "tags": ["work", "family"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Ada");

    let (_, body) = send(&app, Method::GET, "/api/profile/tags", Some(&token), None).await;
    assert_eq!(body, json!(["work", "family"]));

    let (status, body) = send(&app, Method::DELETE, "/api/auth", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account has been deleted");

    let (status, body) = send(&app, Method::GET, "/api/auth", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Unable to reauthorize");
}

#[tokio::test]
async fn test_notifications_newest_first() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    for title in ["first", "second"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/notifications",
            Some(&token),
            Some(json!({ "title": title, "text": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (_, body) = send(&app, Method::GET, "/api/notifications", Some(&token), None).await;
    assert_eq!(body[0]["title"], "second");
    assert_eq!(body[1]["title"], "first");
}

#[tokio::test]
async fn test_journal_ownership() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/journals",
        Some(&owner),
        Some(journal_body()),
    )
    .await;
    let journal = format!("/api/journals/{}", body["id"].as_str().unwrap());
    let missing = format!("/api/journals/{}", uuid::Uuid::new_v4());
    let update = json!({ "isStarred": true });

    let (status, body) = send(&app, Method::GET, &journal, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let (status, _) = send(
        &app,
        Method::PUT,
        &journal,
        Some(&intruder),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &journal, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, &missing, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PUT, &missing, Some(&owner), Some(update.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &missing, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::PUT, &journal, Some(&owner), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isStarred"], true);
    assert_eq!(body["standout"], "Shipped it");

    let (status, _) = send(&app, Method::DELETE, &journal, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &journal, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_ownership() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/notifications",
        Some(&owner),
        Some(json!({ "title": "hi", "text": "there" })),
    )
    .await;
    let notification = format!("/api/notifications/{}", body["id"].as_str().unwrap());
    let missing = format!("/api/notifications/{}", uuid::Uuid::new_v4());

    let (status, _) = send(&app, Method::DELETE, &notification, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &missing, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &notification, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/notifications", Some(&owner), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_journal_listing_sort_and_favorite() {
    let (app, store) = app_with_store();
    let token = register(&app, "ada@example.com").await;
    let user = store
        .find_user_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();

    for (d, mood, starred) in [(1, 3, true), (2, 5, false), (3, 1, true), (4, 4, true)] {
        let day = NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let created = Utc.with_ymd_and_hms(2024, 2, d, 12, 0, 0).unwrap();
        let journal = NewJournal {
            is_starred: starred,
            mood,
            standout: format!("day {}", d),
            went_well: "w".to_string(),
            went_wrong: "x".to_string(),
            better_next_time: "b".to_string(),
            excuses: String::new(),
            tags: Vec::new(),
        };
        store
            .create_journal(user.id, journal, day, created)
            .await
            .unwrap();
    }

    let moods = |body: &Value| -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|j| j["mood"].as_i64().unwrap())
            .collect()
    };

    let uri = "/api/journals?sort=moodAsc";
    let (status, body) = send(&app, Method::GET, uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moods(&body), vec![1, 3, 4, 5]);

    let uri = "/api/journals?favorite=true";
    let (_, body) = send(&app, Method::GET, uri, Some(&token), None).await;
    assert_eq!(moods(&body), vec![4, 1, 3]);

    let uri = "/api/journals?favorite=true&sort=oldest&year=2024&month=2";
    let (_, body) = send(&app, Method::GET, uri, Some(&token), None).await;
    assert_eq!(moods(&body), vec![3, 1, 4]);
}
