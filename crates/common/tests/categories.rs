//! Integration tests for categories

mod common;

use ::common::prelude::*;

#[tokio::test]
async fn test_create_category_under_root() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "admin").await;

    let category = service
        .create_category("sports", "en", "Sports", "/")
        .await
        .unwrap();
    assert_eq!(category.id, "sports");
    assert_eq!(category.locale, "en");
    assert_eq!(category.location, "/");
    assert_eq!(category.description, "Sports");
    assert!(common::node_exists(&repository, "/__categories/sports").await);
}

#[tokio::test]
async fn test_slash_and_empty_category_location_are_equivalent() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "admin").await;

    let empty = service
        .create_category("news", "en", "News", "")
        .await
        .unwrap();
    assert_eq!(empty.location, "/");
    assert!(common::node_exists(&repository, "/__categories/news").await);

    // Same tuple spelled with "/" lands on the same node
    let err = service
        .create_category("news", "en", "News", "/")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Conflict);

    let slash = service
        .create_category("weather", "en", "Weather", "/")
        .await
        .unwrap();
    assert_eq!(slash.location, empty.location);
}

#[tokio::test]
async fn test_nested_categories_and_read() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "admin").await;

    service
        .create_category("sports", "en", "Sports", "/")
        .await
        .unwrap();
    let football = service
        .create_category("football", "en", "Football", "/sports")
        .await
        .unwrap();
    assert_eq!(football.location, "/sports");
    assert_eq!(football.path(), "/sports/football");

    let read = service
        .get_category("/sports/football", "en")
        .await
        .unwrap();
    assert_eq!(read, football);

    let missing_locale = service
        .get_category("/sports/football", "es")
        .await
        .unwrap_err();
    assert_eq!(missing_locale.kind(), ContentErrorKind::NotFound);
}

#[tokio::test]
async fn test_category_location_without_leading_slash() {
    let repository = common::setup_test_env().await;
    let admin = common::service_for(&repository, "admin").await;
    let editor = common::service_for(&repository, "editor").await;

    admin
        .create_category("sports", "en", "Sports", "/")
        .await
        .unwrap();
    let tennis = admin
        .create_category("tennis", "en", "Tennis", "sports")
        .await
        .unwrap();
    assert_eq!(tennis.location, "/sports");
    assert!(common::node_exists(&repository, "/__categories/sports/tennis").await);
    assert!(!common::node_exists(&repository, "/__categoriessports").await);

    let read = admin.get_category("sports/tennis", "en").await.unwrap();
    assert_eq!(read, tennis);

    editor
        .create_text_content("match", "en", "/site/news", "report", "UTF8")
        .await
        .unwrap();
    let content = editor
        .add_content_category("/site/news/match", "en", "sports/tennis")
        .await
        .unwrap();
    assert_eq!(content.categories.len(), 1);
    assert_eq!(content.categories[0].id, "tennis");
}

#[tokio::test]
async fn test_category_conflicts_and_locales() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "admin").await;

    service
        .create_category("sports", "en", "Sports", "/")
        .await
        .unwrap();
    let err = service
        .create_category("sports", "en", "Sports again", "/")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Conflict);

    let spanish = service
        .create_category("sports", "es", "Deportes", "/")
        .await
        .unwrap();
    assert_eq!(spanish.description, "Deportes");
}

#[tokio::test]
async fn test_category_requires_admin() {
    let repository = common::setup_test_env().await;
    let editor = common::service_for(&repository, "editor").await;

    let err = editor
        .create_category("sports", "en", "Sports", "/")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Permission);
    assert!(err.to_string().contains("ADMIN"));
    assert!(!common::node_exists(&repository, "/__categories/sports").await);
}

#[tokio::test]
async fn test_category_parent_must_exist() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "admin").await;

    let err = service
        .create_category("football", "en", "Football", "/sports")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::NotFound);

    let err = service
        .create_category("football", "en", "", "/")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Validation);
}

#[tokio::test]
async fn test_attach_category_to_content() {
    let repository = common::setup_test_env().await;
    let admin = common::service_for(&repository, "admin").await;
    let editor = common::service_for(&repository, "editor").await;

    admin
        .create_category("sports", "en", "Sports", "/")
        .await
        .unwrap();
    editor
        .create_text_content("match", "en", "/site/news", "report", "UTF8")
        .await
        .unwrap();

    let content = editor
        .add_content_category("/site/news/match", "en", "/sports")
        .await
        .unwrap();
    assert_eq!(content.categories.len(), 1);
    assert_eq!(content.categories[0].id, "sports");

    // Attaching twice keeps one reference
    let content = editor
        .add_content_category("/site/news/match", "en", "/sports")
        .await
        .unwrap();
    assert_eq!(content.categories.len(), 1);

    let missing = editor
        .add_content_category("/site/news/match", "en", "/weather")
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ContentErrorKind::NotFound);

    let reader = common::service_for(&repository, "reader").await;
    let denied = reader
        .add_content_category("/site/news/match", "en", "/sports")
        .await
        .unwrap_err();
    assert_eq!(denied.kind(), ContentErrorKind::Permission);
}
