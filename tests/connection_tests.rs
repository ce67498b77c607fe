mod common;

use coursehub::{DbConnection, HubError};
use futures::future::join_all;

#[tokio::test]
async fn second_ensure_connected_reuses_the_pool() {
    let path = common::temp_db_path("idempotent");
    let db = DbConnection::new(Some(common::sqlite_url(&path)));

    assert!(!db.is_connected());
    assert_eq!(db.connect_attempts(), 0);

    db.ensure_connected().await.expect("first connect");
    assert!(db.is_connected());
    db.ensure_connected().await.expect("second connect");

    assert_eq!(db.connect_attempts(), 1);

    db.shutdown().await;
    common::cleanup(&path);
}

#[tokio::test]
async fn clones_share_one_connection() {
    let path = common::temp_db_path("clones");
    let db = DbConnection::new(Some(common::sqlite_url(&path)));
    let other = db.clone();

    db.init().await.expect("connect");
    assert!(other.is_connected());
    other.ensure_connected().await.expect("clone connect");
    assert_eq!(db.connect_attempts(), 1);

    db.shutdown().await;
    common::cleanup(&path);
}

#[tokio::test]
async fn missing_database_url_is_fatal_every_time() {
    for url in [None, Some(String::new()), Some("   ".to_string())] {
        let db = DbConnection::new(url);
        for _ in 0..3 {
            let err = db.ensure_connected().await.unwrap_err();
            assert!(matches!(err, HubError::MissingDatabaseUrl), "got {err:?}");
        }
        assert!(!db.is_connected());
        assert_eq!(db.connect_attempts(), 0);
    }
}

#[tokio::test]
async fn malformed_database_url_is_rejected_before_connecting() {
    let db = DbConnection::new(Some("sqlite:coursehub.sqlite?mode=bogus".to_string()));
    let err = db.ensure_connected().await.unwrap_err();
    assert!(matches!(err, HubError::InvalidDatabaseUrl(_)), "got {err:?}");
    assert_eq!(db.connect_attempts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_a_single_attempt() {
    let path = common::temp_db_path("single-flight");
    let db = DbConnection::new(Some(common::sqlite_url(&path)));

    let tasks = (0..32).map(|_| {
        let db = db.clone();
        tokio::spawn(async move { db.ensure_connected().await.map(|_| ()) })
    });
    for res in join_all(tasks).await {
        res.expect("task panicked").expect("connect failed");
    }

    assert_eq!(db.connect_attempts(), 1);
    assert!(db.is_connected());

    db.shutdown().await;
    common::cleanup(&path);
}

#[tokio::test]
async fn connect_failure_is_propagated_and_retried() {
    let db = DbConnection::new(Some(
        "sqlite:/nonexistent-coursehub-dir/nested/db.sqlite".to_string(),
    ));

    let err = db.ensure_connected().await.unwrap_err();
    assert!(matches!(err, HubError::Connect(_)), "got {err:?}");
    assert!(!db.is_connected());

    let _ = db.ensure_connected().await.unwrap_err();
    assert_eq!(db.connect_attempts(), 2);
}

#[tokio::test]
async fn shutdown_then_reconnect() {
    let path = common::temp_db_path("shutdown");
    let db = DbConnection::new(Some(common::sqlite_url(&path)));

    db.init().await.expect("connect");
    db.shutdown().await;
    assert!(!db.is_connected());
    // second shutdown is a no-op
    db.shutdown().await;

    db.ensure_connected().await.expect("reconnect");
    assert!(db.is_connected());
    assert_eq!(db.connect_attempts(), 2);

    db.shutdown().await;
    common::cleanup(&path);
}

#[tokio::test]
async fn schema_is_registered_on_connect() {
    let db = DbConnection::new(Some("sqlite::memory:".to_string()));
    let pool = db.ensure_connected().await.expect("connect");

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .expect("list tables");
    let names: Vec<_> = tables.into_iter().map(|t| t.0).collect();
    assert_eq!(names, ["notes", "payouts", "users", "wishlists"]);

    // strict tables reject unknown columns
    let res = sqlx::query("SELECT nickname FROM users").fetch_all(&pool).await;
    assert!(res.is_err());

    // registering again reuses the existing tables
    coursehub::db::schema::register_all(&pool)
        .await
        .expect("re-register");
}
