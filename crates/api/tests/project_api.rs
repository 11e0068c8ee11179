//! HTTP-level integration tests for the `/projects` endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate};
use common::{body_json, delete, get, get_anonymous, post_empty, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

const OWNER: &str = "owner@example.com";

fn project_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Quarterly roadmap",
        "goal": "Ship v2",
        "start_date": "2024-01-01",
        "end_date": "2024-03-31",
        "tasks": [
            { "description": "Design", "sub_tasks": ["wireframes", "review"] },
            { "description": "Build", "sub_tasks": ["api", "ui"] },
            { "description": "Launch", "sub_tasks": ["announce", "monitor"] }
        ]
    })
}

/// Create a project through the API and return its JSON detail.
async fn create_project(pool: &PgPool, title: &str) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/projects", OWNER, project_body(title)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn task_ids(detail: &Value) -> Vec<i64> {
    detail["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_writes_whole_tree(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    let detail = create_project(&pool, "Roadmap").await;

    assert_eq!(detail["title"], "Roadmap");
    assert_eq!(detail["active_yn"], "N");
    let tasks = detail["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    for task in tasks {
        assert_eq!(task["sub_tasks"].as_array().unwrap().len(), 2);
        assert_eq!(task["project_id"], detail["id"]);
    }

    let id = detail["id"].as_i64().unwrap();
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/projects/{id}"), OWNER).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(task_ids(&fetched["data"]), task_ids(&detail));
    assert_eq!(fetched["data"]["tasks"][1]["sub_tasks"][0]["content"], "api");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_for_unknown_owner_is_skipped(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        "ghost@example.com",
        project_body("Nobody's"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_rejects_blank_title(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/projects", OWNER, project_body("  ")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_principal_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_anonymous(app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_project_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects/999999", OWNER).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_and_count_are_scoped_to_owner(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    common::seed_user(&pool, "other@example.com").await;
    for title in ["A", "B", "C"] {
        create_project(&pool, title).await;
    }

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/projects?limit=2", OWNER).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"][0]["title"], "A");

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/projects/count", "other@example.com").await;
    assert_eq!(body_json(response).await["data"], 0);

    // Listing needs a known owner.
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects", "ghost@example.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update / reconcile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_reconciles_tasks(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    let detail = create_project(&pool, "Roadmap").await;
    let id = detail["id"].as_i64().unwrap();
    let ids = task_ids(&detail);
    let [design, build, launch] = ids[..] else {
        panic!("expected three tasks");
    };

    let body = json!({
        "title": "Roadmap v2",
        "description": null,
        "goal": "Ship v2.1",
        "start_date": "2024-01-01",
        "end_date": "2024-04-30",
        "updated_tasks": [
            { "idx": build, "description": "Build it well", "sub_tasks": ["api", "ui", "docs"] },
            { "idx": "new-1", "description": "Local only", "sub_tasks": [] }
        ],
        "added_tasks": [
            { "description": "Retro", "sub_tasks": ["notes"] }
        ],
        "deleted_tasks": [launch]
    });
    let app = common::build_test_app(pool.clone());
    let response = put_json(app, &format!("/api/v1/projects/{id}"), OWNER, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Roadmap v2");
    assert_eq!(updated["end_date"], "2024-04-30");
    assert_eq!(updated["reconciled"]["updated"], json!([build]));
    assert_eq!(updated["reconciled"]["deleted"], json!([launch]));
    assert_eq!(updated["reconciled"]["added"].as_array().unwrap().len(), 1);
    assert_eq!(updated["reconciled"]["skipped"][0]["idx"], "new-1");

    let app = common::build_test_app(pool);
    let fetched = body_json(get(app, &format!("/api/v1/projects/{id}"), OWNER).await).await;
    let tasks = fetched["data"]["tasks"].as_array().unwrap();
    let ids = task_ids(&fetched["data"]);
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&design));
    assert!(ids.contains(&build));
    assert!(!ids.contains(&launch));

    let build_task = tasks.iter().find(|t| t["id"] == build).unwrap();
    assert_eq!(build_task["description"], "Build it well");
    assert_eq!(build_task["sub_tasks"].as_array().unwrap().len(), 3);

    let design_task = tasks.iter().find(|t| t["id"] == design).unwrap();
    assert_eq!(design_task["description"], "Design");
    assert_eq!(design_task["sub_tasks"][0]["content"], "wireframes");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rejects_overlapping_lists(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    let detail = create_project(&pool, "Roadmap").await;
    let id = detail["id"].as_i64().unwrap();
    let task = task_ids(&detail)[0];

    let body = json!({
        "title": "Roadmap",
        "start_date": "2024-01-01",
        "end_date": "2024-03-31",
        "updated_tasks": [{ "idx": task, "description": "changed", "sub_tasks": [] }],
        "deleted_tasks": [task]
    });
    let app = common::build_test_app(pool.clone());
    let response = put_json(app, &format!("/api/v1/projects/{id}"), OWNER, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Nothing was written.
    let app = common::build_test_app(pool);
    let fetched = body_json(get(app, &format!("/api/v1/projects/{id}"), OWNER).await).await;
    assert_eq!(fetched["data"]["tasks"].as_array().unwrap().len(), 3);
    assert_eq!(fetched["data"]["tasks"][0]["description"], "Design");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_project_is_skipped(pool: PgPool) {
    let body = json!({
        "title": "Ghost",
        "start_date": "2024-01-01",
        "end_date": "2024-03-31",
        "added_tasks": [{ "description": "never", "sub_tasks": [] }]
    });

    let app = common::build_test_app(pool.clone());
    let response = put_json(app, "/api/v1/projects/424242", OWNER, body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let app = common::build_strict_test_app(pool);
    let response = put_json(app, "/api/v1/projects/424242", OWNER, body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete / activation / deadline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project_twice_is_noop(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    let detail = create_project(&pool, "Short-lived").await;
    let uri = format!("/api/v1/projects/{}", detail["id"]);

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete(app, &uri, OWNER).await.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete(app, &uri, OWNER).await.status(), StatusCode::NO_CONTENT);

    let sub_tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sub_tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sub_tasks, 0);

    let app = common::build_strict_test_app(pool);
    assert_eq!(delete(app, &uri, OWNER).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activation_round_trip(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    let detail = create_project(&pool, "Toggle").await;
    let uri = format!("/api/v1/projects/{}/activation", detail["id"]);

    let app = common::build_test_app(pool.clone());
    let first = body_json(post_empty(app, &uri, OWNER).await).await;
    assert_eq!(first["data"]["active_yn"], "Y");

    let app = common::build_test_app(pool.clone());
    let second = body_json(post_empty(app, &uri, OWNER).await).await;
    assert_eq!(second["data"]["active_yn"], "N");

    let app = common::build_test_app(pool);
    let response = post_empty(app, "/api/v1/projects/777777/activation", OWNER).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deadline_messages(pool: PgPool) {
    common::seed_user(&pool, OWNER).await;
    let detail = create_project(&pool, "Due").await;
    let uri = format!("/api/v1/projects/{}/deadline", detail["id"]);
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

    let cases = [
        (end, "D-DAY".to_string()),
        (
            end - Duration::days(1),
            "D-1 remaining until the project deadline".to_string(),
        ),
        (
            end + Duration::days(1),
            "D+1 passed since the project deadline".to_string(),
        ),
    ];
    for (as_of, expected) in cases {
        let app = common::build_test_app(pool.clone());
        let response = get(app, &format!("{uri}?as_of={as_of}"), OWNER).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], expected);
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects/31337/deadline", OWNER).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], "Cannot compute D-DAY");
}

// ---------------------------------------------------------------------------
// Missing targets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_target_skips_before_validation(pool: PgPool) {
    // Blank title and an overlapping id, but the project does not exist.
    let body = json!({
        "title": "",
        "start_date": "2024-01-01",
        "end_date": "2024-03-31",
        "updated_tasks": [{ "idx": 1, "description": "", "sub_tasks": [] }],
        "deleted_tasks": [1]
    });
    let app = common::build_test_app(pool.clone());
    let response = put_json(app, "/api/v1/projects/515151", OWNER, body).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Unknown owner with an invalid payload.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        "ghost@example.com",
        project_body(""),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_strict_mode_reports_missing_targets(pool: PgPool) {
    let update = json!({
        "title": "Ghost",
        "start_date": "2024-01-01",
        "end_date": "2024-03-31"
    });

    let app = common::build_strict_test_app(pool.clone());
    let response = delete(app, "/api/v1/projects/606060", OWNER).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project '606060' not found");

    let app = common::build_strict_test_app(pool.clone());
    let response = post_empty(app, "/api/v1/projects/606060/activation", OWNER).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_strict_test_app(pool.clone());
    let response = put_json(app, "/api/v1/projects/606060", OWNER, update).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_strict_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        "ghost@example.com",
        project_body("Nobody's"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Strict mode leaves reads alone.
    let app = common::build_strict_test_app(pool);
    let response = get(app, "/api/v1/projects/606060/deadline", OWNER).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], "Cannot compute D-DAY");
}
