//! End-to-end pipeline tests against mocked Drive and Sheets endpoints.
//!
//! Both clients point at one mock server: Drive traffic goes to `/files`,
//! Sheets traffic to `/<spreadsheet id>/...`, so the paths never collide.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidsheet_cli::{SyncConfig, SyncPipeline};
use vidsheet_google::{
    AuthorizedHttp, DriveClient, HttpConfig, RetryConfig, SheetsClient, TokenCache,
};
use vidsheet_models::FolderSpec;

const SPREADSHEET_SEARCH: &str =
    "name = 'Course' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false";
const FOLDER_SEARCH: &str = "'folder1' in parents and mimeType contains 'video'";

fn test_transport() -> AuthorizedHttp {
    let config = HttpConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
            max_delay_ms: 2,
        },
    };
    AuthorizedHttp::new(Arc::new(TokenCache::with_static_token("test-token")), config)
        .expect("transport")
}

fn test_pipeline(server: &MockServer, work_dir: &std::path::Path) -> SyncPipeline {
    let drive = DriveClient::with_base_url(test_transport(), server.uri());
    let sheets = SheetsClient::with_base_url(test_transport(), server.uri());
    let config = SyncConfig {
        sheet_name: "Course".to_string(),
        credentials_path: "credentials.json".into(),
        work_dir: work_dir.to_path_buf(),
        folders: vec![FolderSpec::new("Module 1", "folder1")],
    };
    SyncPipeline::new(drive, sheets, config)
}

/// Mount the fixed mocks every run needs: spreadsheet lookup, worksheet
/// metadata, and the full value table.
async fn mount_sheet_fixtures(server: &MockServer, table: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", SPREADSHEET_SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [{"id": "ss1", "name": "Course"}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ss1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sheets": [{"properties": {"sheetId": 0, "title": "Sheet1"}}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ss1/values/Sheet1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A1:C2",
            "values": table
        })))
        .mount(server)
        .await;
}

async fn mount_folder_listing(server: &MockServer, files: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", FOLDER_SEARCH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "files": files })),
        )
        .mount(server)
        .await;
}

/// Catch-all write mocks asserting that NO cell is written.
async fn mount_no_writes_expected(server: &MockServer) {
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(server)
        .await;
}

fn empty_cell_body() -> serde_json::Value {
    serde_json::json!({"range": "Sheet1!B2", "majorDimension": "ROWS"})
}

#[tokio::test]
async fn already_complete_row_is_skipped_without_writes() {
    let server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_sheet_fixtures(
        &server,
        serde_json::json!([["Lesson", "Video URL", "Length"], ["Welcome", "", ""]]),
    )
    .await;
    mount_folder_listing(
        &server,
        serde_json::json!([{"id": "f1", "name": "01. Welcome.mp4"}]),
    )
    .await;

    // The completion check reads the live cells, which are both filled.
    Mock::given(method("GET"))
        .and(path_regex(r"/values/Sheet1(%21|!)B2$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!B2",
            "values": [["https://drive.google.com/file/d/f1/view"]]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"/values/Sheet1(%21|!)C2$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!C2",
            "values": [["0:10:00"]]
        })))
        .mount(&server)
        .await;

    mount_no_writes_expected(&server).await;

    let summary = test_pipeline(&server, work_dir.path()).run().await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn empty_folder_writes_nothing() {
    let server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_sheet_fixtures(
        &server,
        serde_json::json!([["Lesson", "Video URL", "Length"], ["Welcome", "", ""]]),
    )
    .await;
    mount_folder_listing(&server, serde_json::json!([])).await;
    mount_no_writes_expected(&server).await;

    let summary = test_pipeline(&server, work_dir.path()).run().await.unwrap();
    assert_eq!(summary, Default::default());
}

#[tokio::test]
async fn unmatched_file_is_skipped_without_writes() {
    let server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_sheet_fixtures(
        &server,
        serde_json::json!([["Lesson", "Video URL", "Length"], ["Welcome", "", ""]]),
    )
    .await;
    mount_folder_listing(
        &server,
        serde_json::json!([{"id": "f9", "name": "99. Unknown Topic.mp4"}]),
    )
    .await;
    mount_no_writes_expected(&server).await;

    let summary = test_pipeline(&server, work_dir.path()).run().await.unwrap();
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.updated, 0);
}

#[tokio::test]
async fn failed_download_writes_marker_and_link() {
    let server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_sheet_fixtures(
        &server,
        serde_json::json!([["Lesson", "Video URL", "Length"], ["Setup", "", ""]]),
    )
    .await;
    mount_folder_listing(
        &server,
        serde_json::json!([{"id": "f1", "name": "02. Setup.mp4"}]),
    )
    .await;

    // Both target cells are empty, so the file is processed.
    Mock::given(method("GET"))
        .and(path_regex(r"/values/Sheet1(%21|!)B2$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_cell_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"/values/Sheet1(%21|!)C2$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_cell_body()))
        .mount(&server)
        .await;

    // The download fails, so no duration can be probed.
    Mock::given(method("GET"))
        .and(path("/files/f1"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(404).set_body_string("file not found"))
        .expect(1)
        .mount(&server)
        .await;

    // The URL column still receives the constructed link.
    Mock::given(method("PUT"))
        .and(path_regex(r"/values/Sheet1(%21|!)B2$"))
        .and(body_json(serde_json::json!({
            "values": [["https://drive.google.com/file/d/f1/view"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    // The Length column is pinned to TEXT and receives the marker.
    Mock::given(method("POST"))
        .and(path("/ss1:batchUpdate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"/values/Sheet1(%21|!)C2$"))
        .and(body_json(serde_json::json!({
            "values": [["Error Reading Video"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let summary = test_pipeline(&server, work_dir.path()).run().await.unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped, 0);

    // The failure path skips cleanup, and here the download never produced
    // a local file at all.
    assert!(!work_dir.path().join("02. Setup.mp4").exists());
}

#[tokio::test]
async fn missing_target_column_is_fatal() {
    let server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    mount_sheet_fixtures(
        &server,
        serde_json::json!([["Lesson", "Link", "Duration"], ["Welcome", "", ""]]),
    )
    .await;

    let err = test_pipeline(&server, work_dir.path())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, vidsheet_cli::SyncError::MissingColumn(_)));
}

#[tokio::test]
async fn missing_spreadsheet_is_fatal() {
    let server = MockServer::start().await;
    let work_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", SPREADSHEET_SEARCH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "files": [] })),
        )
        .mount(&server)
        .await;

    let err = test_pipeline(&server, work_dir.path())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        vidsheet_cli::SyncError::SpreadsheetNotFound(_)
    ));
}
