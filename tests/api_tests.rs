use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use homeroom::SchoolStorage;
use homeroom::config::{DatabaseConfig, ServerConfig};
use homeroom::db;
use homeroom::router::{HomeroomState, homeroom_router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn memory_pool() -> db::SqlitePool {
    db::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        ..DatabaseConfig::default()
    })
    .await
    .expect("failed to open in-memory database")
}

async fn app_with_pool(pool: db::SqlitePool, server: &ServerConfig) -> Router {
    let storage = SchoolStorage::new(pool);
    storage
        .init_schema(&DatabaseConfig::default().legacy_device_id)
        .await
        .expect("failed to init schema");
    homeroom_router(HomeroomState::new(storage), server)
}

async fn test_app(server: &ServerConfig) -> Router {
    app_with_pool(memory_pool().await, server).await
}

async fn default_app() -> Router {
    test_app(&ServerConfig::default()).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.clone().oneshot(request).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not json")
    };
    (status, value)
}

#[tokio::test]
async fn create_then_list_students() {
    let app = default_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"device_id": "d1", "number": 5, "name": "Kim"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, json!({"id": 1, "number": 5, "name": "Kim"}));

    let (status, list) = send(&app, "GET", "/api/students?device_id=d1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        list,
        json!([{
            "id": 1,
            "device_id": "d1",
            "number": 5,
            "name": "Kim",
            "phone": "",
            "parent_phone": "",
            "memo": ""
        }])
    );
}

#[tokio::test]
async fn create_student_requires_number_and_name() {
    let app = default_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"device_id": "d1", "phone": "010"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing required field(s): number, name"}));
}

#[tokio::test]
async fn reads_require_device_id() {
    let app = default_app().await;
    let (status, body) = send(&app, "GET", "/api/students", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing required field(s): device_id"}));
}

#[tokio::test]
async fn student_lookup_is_404_across_tenants() {
    let app = default_app().await;
    send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"device_id": "a", "number": 1, "name": "Kim"})),
    )
    .await;

    let (status, student) = send(&app, "GET", "/api/students/1?device_id=a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["name"], "Kim");

    let (status, body) = send(&app, "GET", "/api/students/1?device_id=b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "student not found"}));

    let (_, list) = send(&app, "GET", "/api/students?device_id=b", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn non_numeric_id_is_a_json_400() {
    let app = default_app().await;
    let (status, body) = send(&app, "GET", "/api/students/abc?device_id=a", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_and_delete_acknowledge_unknown_ids() {
    let app = default_app().await;
    let (status, body) = send(
        &app,
        "PUT",
        "/api/students/42",
        Some(json!({"device_id": "d1", "number": 1, "name": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "updated"}));

    let (status, body) = send(&app, "DELETE", "/api/students/42?device_id=d1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "deleted"}));
}

#[tokio::test]
async fn attendance_upsert_and_stats() {
    let app = default_app().await;
    for status in ["present", "late"] {
        let (code, body) = send(
            &app,
            "POST",
            "/api/attendance",
            Some(json!({
                "device_id": "d1",
                "student_id": 1,
                "date": "2024-03-04",
                "status": status,
                "reason": "bus"
            })),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, json!({"message": "saved"}));
    }
    send(
        &app,
        "POST",
        "/api/attendance",
        Some(json!({"device_id": "d1", "student_id": 1, "date": "2024-03-05", "status": "present"})),
    )
    .await;

    let (_, day) = send(&app, "GET", "/api/attendance/2024-03-04?device_id=d1", None).await;
    assert_eq!(
        day,
        json!([{"student_id": 1, "status": "late", "reason": "bus"}])
    );

    let (_, stats) = send(&app, "GET", "/api/attendance/stats/1?device_id=d1", None).await;
    assert_eq!(
        stats,
        json!([{"status": "late", "count": 1}, {"status": "present", "count": 1}])
    );

    let (_, other) = send(&app, "GET", "/api/attendance/stats/1?device_id=d2", None).await;
    assert_eq!(other, json!([]));
}

#[tokio::test]
async fn records_ignore_client_timestamps() {
    let app = default_app().await;
    let (status, created) = send(
        &app,
        "POST",
        "/api/records",
        Some(json!({
            "device_id": "d1",
            "student_id": 1,
            "type": "praise",
            "content": "cleaned up the classroom",
            "created_at": "1999-01-01 00:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
    assert_eq!(created["student_id"], 1);
    assert_eq!(created["type"], "praise");
    assert_eq!(created["content"], "cleaned up the classroom");

    let stamp = created["created_at"].as_str().expect("created_at is a string");
    assert_ne!(stamp, "1999-01-01 00:00:00");
    assert!(
        chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok(),
        "unexpected timestamp {stamp}"
    );

    let (_, records) = send(&app, "GET", "/api/records/1?device_id=d1", None).await;
    assert_eq!(records.as_array().map(Vec::len), Some(1));
    assert_eq!(records[0]["created_at"], stamp);

    let (status, body) = send(&app, "DELETE", "/api/records/1?device_id=d1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "deleted"}));
    let (_, records) = send(&app, "GET", "/api/records/1?device_id=d1", None).await;
    assert_eq!(records, json!([]));
}

#[tokio::test]
async fn record_requires_type_and_content() {
    let app = default_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/records",
        Some(json!({"device_id": "d1", "student_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing required field(s): type, content"}));
}

#[tokio::test]
async fn deleting_student_clears_its_history() {
    let app = default_app().await;
    send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"device_id": "d1", "number": 1, "name": "Kim"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/attendance",
        Some(json!({"device_id": "d1", "student_id": 1, "date": "2024-03-04", "status": "absent"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/records",
        Some(json!({"device_id": "d1", "student_id": 1, "type": "note", "content": "called parent"})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", "/api/students/1?device_id=d1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/students/1?device_id=d1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, stats) = send(&app, "GET", "/api/attendance/stats/1?device_id=d1", None).await;
    assert_eq!(stats, json!([]));
    let (_, records) = send(&app, "GET", "/api/records/1?device_id=d1", None).await;
    assert_eq!(records, json!([]));
}

#[tokio::test]
async fn malformed_json_gets_error_body() {
    let app = default_app().await;
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/students")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn oversized_body_returns_413() {
    let server = ServerConfig {
        body_limit: 1024,
        ..ServerConfig::default()
    };
    let app = test_app(&server).await;

    let memo = "a".repeat(4 * 1024);
    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"device_id": "d1", "number": 1, "name": "Kim", "memo": memo})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn numeric_strings_are_accepted_for_numbers() {
    let app = default_app().await;
    let (status, created) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"device_id": "d1", "number": "5", "name": "Kim"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, json!({"id": 1, "number": 5, "name": "Kim"}));

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(json!({"device_id": "d1", "student_id": "1", "date": "2024-03-04", "status": "present"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, stats) = send(&app, "GET", "/api/attendance/stats/1?device_id=d1", None).await;
    assert_eq!(stats, json!([{"status": "present", "count": 1}]));
}

#[tokio::test]
async fn mistyped_body_field_is_400() {
    let app = default_app().await;
    for number in [json!("five"), json!(true), json!([5])] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/students",
            Some(json!({"device_id": "d1", "number": number, "name": "Kim"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "number = {number}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn zero_ids_count_as_missing() {
    let app = default_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"device_id": "d1", "number": 0, "name": "Kim"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing required field(s): number"}));

    let (status, body) = send(
        &app,
        "POST",
        "/api/records",
        Some(json!({"device_id": "d1", "student_id": 0, "type": "note", "content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing required field(s): student_id"}));
}

#[tokio::test]
async fn migrated_single_user_data_is_served_under_legacy_tenant() {
    let pool = memory_pool().await;
    for ddl in [
        "CREATE TABLE students (id INTEGER PRIMARY KEY AUTOINCREMENT, number INTEGER NOT NULL, \
         name TEXT NOT NULL, phone TEXT, parent_phone TEXT, memo TEXT)",
        "CREATE TABLE attendance (id INTEGER PRIMARY KEY AUTOINCREMENT, student_id INTEGER NOT NULL, \
         date TEXT NOT NULL, status TEXT NOT NULL, UNIQUE(student_id, date))",
        "INSERT INTO students (number, name) VALUES (3, 'Choi')",
        "INSERT INTO attendance (student_id, date, status) VALUES (1, '2024-03-04', 'present')",
    ] {
        sqlx::query(ddl).execute(&pool).await.unwrap();
    }
    let app = app_with_pool(pool, &ServerConfig::default()).await;

    let (status, list) = send(&app, "GET", "/api/students?device_id=legacy", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["name"], "Choi");
    assert_eq!(list[0]["device_id"], "legacy");

    // another tenant can now mark the same student id on the same day
    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(json!({"device_id": "d2", "student_id": 1, "date": "2024-03-04", "status": "late"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, day) = send(&app, "GET", "/api/attendance/2024-03-04?device_id=legacy", None).await;
    assert_eq!(day, json!([{"student_id": 1, "status": "present", "reason": null}]));

    let (status, _) = send(&app, "DELETE", "/api/students/1?device_id=legacy", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&app, "GET", "/api/students?device_id=legacy", None).await;
    assert_eq!(list, json!([]));
}
