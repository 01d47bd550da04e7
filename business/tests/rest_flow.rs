//! Controller driving the REST storage client against a mocked service.

use stash_business::{
    FileController, FixedClock, SelectedFile, StashConfig, StorageBackend, UploadState, messages,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FlowTestContext {
    server: MockServer,
    controller: FileController<StorageBackend>,
}

impl FlowTestContext {
    async fn new(millis: i64) -> Self {
        let server = MockServer::start().await;
        let config = StashConfig::default().with_storage_url(server.uri());
        let backend = StorageBackend::from_config(&config);
        assert!(backend.is_remote(), "a URL should select the REST backend");
        let controller = FileController::with_clock(backend, &config, FixedClock(millis));
        Self { server, controller }
    }

    async fn mount_listing(&self, body: serde_json::Value, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/list/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }
}

fn report() -> SelectedFile {
    SelectedFile::new("My Report.pdf", b"%PDF".to_vec()).with_content_type("application/pdf")
}

#[tokio::test]
async fn mount_refresh_on_empty_bucket() {
    let ctx = FlowTestContext::new(0).await;
    ctx.mount_listing(serde_json::json!([]), 1).await;

    ctx.controller.refresh_listing().await;

    let state = ctx.controller.snapshot();
    assert!(state.listing.entries.is_empty());
    assert!(!state.listing.loading);
    assert_eq!(state.upload, UploadState::Idle);
}

#[tokio::test]
async fn upload_then_refresh_shows_new_file() {
    let ctx = FlowTestContext::new(1000).await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/files/1000_My_Report.pdf"))
        .and(header("x-upsert", "false"))
        .and(header("cache-control", "max-age=3600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "files/1000_My_Report.pdf"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    ctx.mount_listing(
        serde_json::json!([{
            "name": "1000_My_Report.pdf",
            "id": "c0ffee",
            "updated_at": "2024-05-01T10:00:00.000Z",
            "metadata": {"size": 4, "mimetype": "application/pdf"}
        }]),
        1,
    )
    .await;

    ctx.controller.select_file(Some(report()));
    ctx.controller.upload().await;

    let state = ctx.controller.snapshot();
    assert_eq!(
        state.upload,
        UploadState::Success(messages::UPLOAD_SUCCEEDED.to_owned())
    );
    assert!(state.selected.is_none());
    assert_eq!(state.listing.entries.len(), 1);
    assert_eq!(state.listing.entries[0].name, "1000_My_Report.pdf");
    assert_eq!(
        ctx.controller.public_url("1000_My_Report.pdf"),
        format!(
            "{}/storage/v1/object/public/files/1000_My_Report.pdf",
            ctx.server.uri()
        )
    );
}

#[tokio::test]
async fn quota_error_is_shown_and_file_kept() {
    let ctx = FlowTestContext::new(1000).await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/files/1000_My_Report.pdf"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "statusCode": "413",
            "error": "Payload too large",
            "message": "quota exceeded"
        })))
        .mount(&ctx.server)
        .await;
    ctx.mount_listing(serde_json::json!([]), 0).await;

    ctx.controller.select_file(Some(report()));
    ctx.controller.upload().await;

    let state = ctx.controller.snapshot();
    let message = state.upload.message().expect("error message expected");
    assert!(message.contains("quota exceeded"), "got {message}");
    assert_eq!(state.selected, Some(report()));
    assert!(state.upload_enabled());
}

#[tokio::test]
async fn listing_failure_surfaces_service_detail() {
    let ctx = FlowTestContext::new(0).await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/list/files"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "statusCode": "404",
            "error": "Bucket not found",
            "message": "Bucket not found"
        })))
        .mount(&ctx.server)
        .await;

    ctx.controller.refresh_listing().await;

    let state = ctx.controller.snapshot();
    assert!(!state.listing.loading);
    let message = state.upload.message().expect("error message expected");
    assert!(message.starts_with(messages::LIST_FAILED));
    assert!(message.contains("Bucket not found"));
}

#[tokio::test]
async fn concurrent_refreshes_all_terminate() {
    let ctx = FlowTestContext::new(0).await;
    ctx.mount_listing(serde_json::json!([{"name": "a.txt", "id": "1"}]), 3)
        .await;

    let a = ctx.controller.clone();
    let b = ctx.controller.clone();
    let c = ctx.controller.clone();
    tokio::join!(a.refresh_listing(), b.refresh_listing(), c.refresh_listing());

    let state = ctx.controller.snapshot();
    assert!(!state.listing.loading);
    assert_eq!(state.listing.entries.len(), 1);
}
