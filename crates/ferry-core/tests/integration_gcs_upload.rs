//! Integration tests: single-file and folder uploads through `GcsStore`
//! against a local server speaking the JSON API media upload endpoint.

mod common;

use common::http_server::{closed_port_url, Response, TestServer};
use ferry_core::events::{NullSink, TransferEvent};
use ferry_core::store::GcsStore;
use ferry_core::upload::{upload_file, upload_folder, Destination};
use ferry_core::TransferError;
use std::fs;
use tempfile::tempdir;

const OBJECT_RESOURCE: &str = r#"{"kind":"storage#object","name":"x","bucket":"lake"}"#;

fn ok_server() -> TestServer {
    TestServer::fixed(200, OBJECT_RESOURCE)
}

/// `name=` query value of an upload request, percent-decoded.
fn object_name(target: &str) -> String {
    let query = target.split_once('?').map(|(_, q)| q).unwrap_or("");
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "name")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

#[test]
fn upload_file_posts_media_with_bearer_token() {
    let server = ok_server();
    let dir = tempdir().unwrap();
    let path = dir.path().join("gares.parquet");
    let content: Vec<u8> = (0u8..=255).cycle().take(200 * 1024).collect();
    fs::write(&path, &content).unwrap();

    let store = GcsStore::new(server.base_url.clone(), "ya29.test-token");
    let uri = upload_file(&store, &path, &Destination::new("lake"), &mut NullSink).unwrap();
    assert_eq!(uri, "gs://lake/bronze/gares.parquet");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(
        req.target,
        "/upload/storage/v1/b/lake/o?uploadType=media&name=bronze%2Fgares.parquet"
    );
    assert_eq!(req.header("authorization"), Some("Bearer ya29.test-token"));
    assert_eq!(req.header("content-type"), Some("application/octet-stream"));
    assert_eq!(req.body, content);
}

#[test]
fn upload_file_with_subfolder_and_empty_file() {
    let server = ok_server();
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, b"").unwrap();

    let store = GcsStore::new(server.base_url.clone(), "t");
    let dest = Destination::new("lake").with_subfolder("idfm");
    let uri = upload_file(&store, &path, &dest, &mut NullSink).unwrap();
    assert_eq!(uri, "gs://lake/bronze/idfm/empty.csv");

    let req = &server.requests()[0];
    assert_eq!(object_name(&req.target), "bronze/idfm/empty.csv");
    assert!(req.body.is_empty());
}

#[test]
fn upload_folder_sends_filtered_tree() {
    let server = ok_server();
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.csv"), b"a").unwrap();
    fs::write(dir.path().join("b.txt"), b"bb").unwrap();
    fs::write(dir.path().join("sub").join("c.csv"), b"ccc").unwrap();

    let store = GcsStore::new(server.base_url.clone(), "t");
    let exts = vec!["csv".to_string()];
    let mut events: Vec<TransferEvent> = Vec::new();
    let summary = upload_folder(
        &store,
        dir.path(),
        &Destination::new("lake"),
        Some(exts.as_slice()),
        &mut events,
    )
    .unwrap();

    assert_eq!(summary.uploaded, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total_bytes, 4);

    let mut sent: Vec<(String, Vec<u8>)> = server
        .requests()
        .iter()
        .map(|r| (object_name(&r.target), r.body.clone()))
        .collect();
    sent.sort();
    assert_eq!(
        sent,
        vec![
            ("bronze/a.csv".to_string(), b"a".to_vec()),
            ("bronze/sub/c.csv".to_string(), b"ccc".to_vec()),
        ]
    );
    assert!(matches!(
        events.last(),
        Some(TransferEvent::FolderFinished { uri, .. }) if uri == "gs://lake/bronze/"
    ));
}

#[test]
fn upload_forbidden_surfaces_api_message() {
    let server = TestServer::fixed(
        403,
        r#"{"error":{"code":403,"message":"svc@proj.iam.gserviceaccount.com does not have storage.objects.create access"}}"#,
    );
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, b"a").unwrap();

    let store = GcsStore::new(server.base_url.clone(), "t");
    let err = upload_file(&store, &path, &Destination::new("lake"), &mut NullSink).unwrap_err();
    match err {
        TransferError::Storage {
            bucket,
            key,
            status,
            message,
        } => {
            assert_eq!(bucket, "lake");
            assert_eq!(key, "bronze/a.csv");
            assert_eq!(status, Some(403));
            assert!(message.contains("storage.objects.create"));
        }
        other => panic!("expected Storage error, got {other:?}"),
    }
}

#[test]
fn folder_upload_stops_at_first_failure() {
    let server = TestServer::start(|_| Response::new(500, "backend error"));
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.csv"), b"a").unwrap();
    fs::write(dir.path().join("b.csv"), b"b").unwrap();

    let store = GcsStore::new(server.base_url.clone(), "t");
    let err = upload_folder(
        &store,
        dir.path(),
        &Destination::new("lake"),
        None,
        &mut NullSink,
    )
    .unwrap_err();
    match err {
        TransferError::Storage { status, message, .. } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "backend error");
        }
        other => panic!("expected Storage error, got {other:?}"),
    }
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn unreachable_store_is_storage_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, b"a").unwrap();

    let store = GcsStore::new(closed_port_url(), "t");
    let err = upload_file(&store, &path, &Destination::new("lake"), &mut NullSink).unwrap_err();
    assert!(
        matches!(err, TransferError::Storage { status: None, .. }),
        "{err:?}"
    );
}

#[test]
fn missing_paths_never_reach_the_store() {
    let server = ok_server();
    let dir = tempdir().unwrap();
    let store = GcsStore::new(server.base_url.clone(), "t");

    let err = upload_file(
        &store,
        &dir.path().join("missing.csv"),
        &Destination::new("lake"),
        &mut NullSink,
    )
    .unwrap_err();
    assert!(matches!(err, TransferError::NotFound { .. }));

    let err = upload_folder(
        &store,
        &dir.path().join("missing"),
        &Destination::new("lake"),
        None,
        &mut NullSink,
    )
    .unwrap_err();
    assert!(matches!(err, TransferError::NotFound { .. }));

    assert!(server.requests().is_empty());
}
