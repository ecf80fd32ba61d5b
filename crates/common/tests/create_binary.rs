//! Integration tests for binary content creation

mod common;

use std::io::Cursor;

use ::common::prelude::*;

#[tokio::test]
async fn test_create_binary_content() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "editor").await;

    let payload = b"\x89PNG\r\n\x1a\nfake image".to_vec();
    let size = payload.len() as u64;
    let created = service
        .create_binary_content(
            "logo",
            "en",
            "/site",
            "image/png",
            size,
            "logo.png",
            Cursor::new(payload.clone()),
        )
        .await
        .unwrap();

    assert_eq!(created.kind(), ContentKind::Binary);
    match &created.body {
        ContentBody::Binary {
            content_type,
            file_name,
            size: stored,
            data,
        } => {
            assert_eq!(content_type, "image/png");
            assert_eq!(file_name, "logo.png");
            assert_eq!(*stored, size);
            assert_eq!(data.as_ref(), payload.as_slice());
        }
        other => panic!("unexpected body {:?}", other),
    }

    let read = service.get_content("/site/logo", "en").await.unwrap();
    assert_eq!(read.data(), Some(payload.as_slice()));
}

#[tokio::test]
async fn test_binary_validation() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "editor").await;

    let zero_size = service
        .create_binary_content("f", "en", "/site", "text/plain", 0, "f.txt", Cursor::new(b"x".to_vec()))
        .await
        .unwrap_err();
    assert_eq!(zero_size.kind(), ContentErrorKind::Validation);

    let empty_stream = service
        .create_binary_content("f", "en", "/site", "text/plain", 1, "f.txt", Cursor::new(Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(empty_stream.kind(), ContentErrorKind::Validation);

    let no_type = service
        .create_binary_content("f", "en", "/site", "", 1, "f.txt", Cursor::new(b"x".to_vec()))
        .await
        .unwrap_err();
    assert_eq!(no_type.kind(), ContentErrorKind::Validation);

    let no_name = service
        .create_binary_content("f", "en", "/site", "text/plain", 1, "", Cursor::new(b"x".to_vec()))
        .await
        .unwrap_err();
    assert_eq!(no_name.kind(), ContentErrorKind::Validation);

    assert!(!common::node_exists(&repository, "/site/f").await);
}

#[tokio::test]
async fn test_binary_and_text_cannot_share_an_id() {
    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "editor").await;

    service
        .create_text_content("doc", "en", "/site", "hello", "UTF8")
        .await
        .unwrap();
    let err = service
        .create_binary_content("doc", "es", "/site", "text/plain", 1, "doc.txt", Cursor::new(b"x".to_vec()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Conflict);
    assert!(!common::variant_exists(&repository, "/site/doc", "es").await);
}

#[tokio::test]
async fn test_unreadable_stream_is_io() {
    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }

    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "editor").await;
    let err = service
        .create_binary_content("f", "en", "/site", "text/plain", 1, "f.txt", Broken)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Io);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_validation_runs_before_reading_stream() {
    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }

    let repository = common::setup_test_env().await;
    let service = common::service_for(&repository, "editor").await;

    let err = service
        .create_binary_content("", "en", "/site", "text/plain", 1, "f.txt", Broken)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Validation);

    let err = service
        .create_binary_content("f", "en", "/site", "text/plain", 0, "f.txt", Broken)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Validation);

    let err = service
        .create_binary_content("f", "en", "/site", "text/plain", 1, "", Broken)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Validation);
    assert!(!common::node_exists(&repository, "/site/f").await);
}
