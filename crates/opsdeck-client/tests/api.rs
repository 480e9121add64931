use opsdeck_client::{collect_analysis, ApiClient, ApiError, SopSession};
use opsdeck_core::jd::JdIntake;
use opsdeck_core::sop::SopGenerateRequest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(server.url(), Some("tok_test".into())).unwrap()
}

fn json_header() -> (&'static str, &'static str) {
    ("content-type", "application/json")
}

const KB_BODY: &str = r#"{
    "success": true,
    "organizationProfile": {
        "businessName": "Acme Plumbing",
        "industry": "Home Services",
        "requiredFieldsComplete": true
    },
    "completionAnalysis": {
        "overallScore": 72,
        "tier1Essential": {"percentage": 100, "complete": true},
        "tier2Context": {"percentage": 50, "complete": false},
        "tier3Intelligence": {"percentage": 20, "complete": false}
    },
    "documents": [
        {"id": "doc-1", "fileName": "handbook.pdf", "extractionStatus": "COMPLETED"}
    ]
}"#;

const SOP_BODY: &str = r#"{
    "success": true,
    "sop": {
        "id": "sop-1",
        "title": "Customer onboarding",
        "versionNumber": 2,
        "content": {"markdown": "# Onboarding", "html": "<h1>Onboarding</h1>"}
    }
}"#;

// ---------------------------------------------------------------------------
// Knowledge base
// ---------------------------------------------------------------------------

#[tokio::test]
async fn knowledge_base_parses_full_envelope() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    let mock = server
        .mock("GET", "/api/organization-knowledge-base")
        .with_status(200)
        .with_header(k, v)
        .with_body(KB_BODY)
        .create_async()
        .await;

    let snapshot = client_for(&server).knowledge_base().await.unwrap();
    assert_eq!(
        snapshot.profile.unwrap().business_name.as_deref(),
        Some("Acme Plumbing")
    );
    let completion = snapshot.completion.unwrap();
    assert!(completion.tier1_essential.complete);
    assert!(snapshot.quality.is_none());
    assert_eq!(snapshot.documents.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn success_false_surfaces_server_message() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("GET", "/api/organization-knowledge-base")
        .with_status(200)
        .with_header(k, v)
        .with_body(r#"{"success": false, "message": "organization not found"}"#)
        .create_async()
        .await;

    let err = client_for(&server).knowledge_base().await.unwrap_err();
    match err {
        ApiError::Server { message, .. } => assert_eq!(message, "organization not found"),
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn quality_analysis_absent_is_a_valid_state() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("GET", "/api/organization-knowledge-base/analyze-quality")
        .with_status(200)
        .with_header(k, v)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let quality = client_for(&server).quality_analysis().await.unwrap();
    assert!(quality.is_none());
}

// ---------------------------------------------------------------------------
// Error triage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limit_is_detected_before_generic_error_parsing() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("POST", "/api/jd/analyze")
        .with_status(429)
        .with_header(k, v)
        .with_header("retry-after", "30")
        .with_body(r#"{"error": "rate_limit", "userMessage": "Too many analyses. Give it a minute."}"#)
        .create_async()
        .await;

    let intake = JdIntake {
        role_title: "Ops Manager".into(),
        ..Default::default()
    };
    let err = client_for(&server).analyze_role(&intake).await.unwrap_err();
    match err {
        ApiError::RateLimited {
            message,
            retry_after_seconds,
        } => {
            assert_eq!(message, "Too many analyses. Give it a minute.");
            assert_eq!(retry_after_seconds, Some(30));
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn exhausted_quota_header_outranks_error_status() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("POST", "/api/sop/generate")
        .with_status(400)
        .with_header(k, v)
        .with_header("x-ratelimit-remaining", "0")
        .with_body(r#"{"error": "bad request"}"#)
        .create_async()
        .await;

    let request = SopGenerateRequest {
        business_name: "Acme".into(),
        tasks: vec!["Dispatch".into()],
        ..Default::default()
    };
    let err = client_for(&server).generate_sop(&request).await.unwrap_err();
    assert!(err.is_rate_limited(), "got {err:?}");
}

#[tokio::test]
async fn server_error_prefers_user_message_for_display() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("GET", "/api/organization-knowledge-base")
        .with_status(500)
        .with_header(k, v)
        .with_body(
            r#"{"error": "upstream 502 from generator", "userMessage": "We hit a snag. Try again."}"#,
        )
        .create_async()
        .await;

    let err = client_for(&server).knowledge_base().await.unwrap_err();
    assert_eq!(err.display_message(), "We hit a snag. Try again.");
    match err {
        ApiError::Server {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream 502 from generator");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Streamed role analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_role_streams_progress_then_result() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        r#"{"type":"progress","stage":"reading intake"}"#,
        "\n",
        r#"{"type":"progress","stage":"drafting"}"#,
        "\n",
        r#"{"type":"result","data":{"preview":{"title":"Ops Manager"},"fullPackage":{}}}"#,
        "\n",
    );
    server
        .mock("POST", "/api/jd/analyze")
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(body)
        .create_async()
        .await;

    let intake = JdIntake {
        role_title: "Ops Manager".into(),
        ..Default::default()
    };
    let stream = client_for(&server).analyze_role(&intake).await.unwrap();
    let mut stages = Vec::new();
    let analysis = collect_analysis(stream, |s| stages.push(s.to_string()))
        .await
        .unwrap();
    assert_eq!(analysis.preview.title, "Ops Manager");
    assert_eq!(stages, vec!["reading intake", "drafting"]);
}

#[tokio::test]
async fn analyze_role_error_envelope_fails_the_operation() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        r#"{"type":"progress","stage":"drafting"}"#,
        "\n",
        r#"{"type":"error","error":"generation failed","details":"stage=draft","userMessage":"Please retry"}"#,
        "\n",
    );
    server
        .mock("POST", "/api/jd/analyze")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let intake = JdIntake {
        role_title: "Ops Manager".into(),
        ..Default::default()
    };
    let stream = client_for(&server).analyze_role(&intake).await.unwrap();
    let err = collect_analysis(stream, |_| {}).await.unwrap_err();
    assert_eq!(err.display_message(), "Please retry");
}

#[tokio::test]
async fn analyze_role_stream_without_result_is_a_hard_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/jd/analyze")
        .with_status(200)
        .with_body(concat!(r#"{"type":"progress","stage":"drafting"}"#, "\n"))
        .create_async()
        .await;

    let intake = JdIntake {
        role_title: "Ops Manager".into(),
        ..Default::default()
    };
    let stream = client_for(&server).analyze_role(&intake).await.unwrap();
    let err = collect_analysis(stream, |_| {}).await.unwrap_err();
    assert_eq!(err.to_string(), "No data received from analysis");
}

#[tokio::test]
async fn analyze_role_validation_never_reaches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/jd/analyze")
        .expect(0)
        .create_async()
        .await;

    let err = client_for(&server)
        .analyze_role(&JdIntake::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    mock.assert_async().await;
}

// ---------------------------------------------------------------------------
// SOP versioning
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_sop_library_is_an_empty_list() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("GET", "/api/sop/saved")
        .with_status(404)
        .with_header(k, v)
        .with_body(r#"{"error": "no saved sops"}"#)
        .create_async()
        .await;

    let sops = client_for(&server).saved_sops().await.unwrap();
    assert!(sops.is_empty());
}

#[tokio::test]
async fn session_falls_back_to_synthetic_version_when_endpoint_fails() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("GET", "/api/sop/sop-1")
        .with_status(200)
        .with_header(k, v)
        .with_body(SOP_BODY)
        .create_async()
        .await;
    server
        .mock("GET", "/api/sop/sop-1/versions")
        .with_status(500)
        .with_header(k, v)
        .with_body(r#"{"error": "versions table missing"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let session = SopSession::open(&client, "sop-1").await.unwrap();
    assert_eq!(session.versions().len(), 1);
    let only = &session.versions()[0];
    assert_eq!(only.id, "sop-1");
    assert_eq!(only.version_number, 2);
    assert!(only.is_current_version);
    assert_eq!(session.selected_content().markdown(), Some("# Onboarding"));
}

#[tokio::test]
async fn select_falls_back_to_scanning_the_listing() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("GET", "/api/sop/sop-1")
        .with_status(200)
        .with_header(k, v)
        .with_body(SOP_BODY)
        .create_async()
        .await;
    server
        .mock("GET", "/api/sop/sop-1/versions")
        .with_status(200)
        .with_header(k, v)
        .with_body(
            r#"{"success": true, "versions": [
                {"id": "v1", "versionNumber": 1, "content": {"markdown": "# v1"}},
                {"id": "v2", "versionNumber": 2, "isCurrentVersion": true, "content": {"markdown": "# v2"}}
            ]}"#,
        )
        .create_async()
        .await;
    // Direct fetch of the old version is not served.
    server
        .mock("GET", "/api/sop/v1")
        .with_status(404)
        .with_header(k, v)
        .with_body(r#"{"error": "not found"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut session = SopSession::open(&client, "sop-1").await.unwrap();
    assert_eq!(session.selected_version_id(), "v2");

    session.select("v1").await.unwrap();
    assert_eq!(session.selected_version_id(), "v1");
    assert_eq!(session.selected_content().markdown(), Some("# v1"));
    // Flags still reflect the server listing, untouched by selection.
    assert!(session.versions().iter().any(|x| x.id == "v2" && x.is_current_version));
}

#[tokio::test]
async fn failed_selection_leaves_prior_state_intact() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    server
        .mock("GET", "/api/sop/sop-1")
        .with_status(200)
        .with_header(k, v)
        .with_body(SOP_BODY)
        .create_async()
        .await;
    server
        .mock("GET", "/api/sop/sop-1/versions")
        .with_status(200)
        .with_header(k, v)
        .with_body(
            r#"{"success": true, "versions": [
                {"id": "v1", "versionNumber": 1, "isCurrentVersion": true, "content": {"markdown": "# v1"}}
            ]}"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/sop/ghost")
        .with_status(404)
        .with_header(k, v)
        .with_body(r#"{"error": "not found"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut session = SopSession::open(&client, "sop-1").await.unwrap();
    let err = session.select("ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::ContentUnavailable(_)));
    assert_eq!(session.selected_version_id(), "v1");
    assert_eq!(session.selected_content().markdown(), Some("# v1"));
}

#[tokio::test]
async fn restore_refetches_document_and_versions_from_the_server() {
    let mut server = mockito::Server::new_async().await;
    let (k, v) = json_header();
    let doc_mock = server
        .mock("GET", "/api/sop/sop-1")
        .with_status(200)
        .with_header(k, v)
        .with_body(SOP_BODY)
        .expect(2)
        .create_async()
        .await;
    // Listing as seen before the restore.
    server
        .mock("GET", "/api/sop/sop-1/versions")
        .with_status(200)
        .with_header(k, v)
        .with_body(
            r#"{"success": true, "versions": [
                {"id": "v1", "versionNumber": 1, "content": {"markdown": "# v1"}},
                {"id": "v2", "versionNumber": 2, "isCurrentVersion": true, "content": {"markdown": "# v2"}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let mut session = SopSession::open(&client, "sop-1").await.unwrap();
    assert_eq!(session.selected_version_id(), "v2");

    let restore_mock = server
        .mock("POST", "/api/sop/sop-1/restore")
        .with_status(200)
        .with_header(k, v)
        .with_body(r#"{"success": true}"#)
        .expect(1)
        .create_async()
        .await;
    // Server truth after the restore: v3 is the new current pointer.
    server
        .mock("GET", "/api/sop/sop-1/versions")
        .with_status(200)
        .with_header(k, v)
        .with_body(
            r#"{"success": true, "versions": [
                {"id": "v1", "versionNumber": 1, "content": {"markdown": "# v1"}},
                {"id": "v2", "versionNumber": 2, "content": {"markdown": "# v2"}},
                {"id": "v3", "versionNumber": 3, "isCurrentVersion": true, "content": {"markdown": "# v1"}}
            ]}"#,
        )
        .create_async()
        .await;

    session.restore("v1").await.unwrap();
    restore_mock.assert_async().await;
    doc_mock.assert_async().await;

    // Everything re-derived from the second listing, not locally flipped.
    assert_eq!(session.versions().len(), 3);
    assert_eq!(session.selected_version_id(), "v3");
    assert_eq!(session.selected_content().markdown(), Some("# v1"));
}

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_carries_filename_and_bytes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/sop/download")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_header(
            "content-disposition",
            r#"attachment; filename="customer-onboarding.pdf""#,
        )
        .with_body("%PDF-1.7 fake")
        .create_async()
        .await;

    let download = client_for(&server).download_sop("sop-1").await.unwrap();
    assert_eq!(
        download.file_name.as_deref(),
        Some("customer-onboarding.pdf")
    );
    assert_eq!(&download.bytes[..], b"%PDF-1.7 fake");
}
