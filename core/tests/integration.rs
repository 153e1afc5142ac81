//! End-to-end calls against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building, the transport and response parsing agree with the server.

use std::net::SocketAddr;

use latech_core::{
    ApiClient, ApiError, ApiResponse, ClientConfig, HealthStatus, HttpMethod, PreprocessOptions, PreprocessResize,
    RequestOptions, UreqTransport,
};
use mock_server::{Job, MockStore, PLACEHOLDER_LATEX, PLACEHOLDER_PDF};

/// Larger than ureq's default 10 MB body limit.
const LARGE_BODY_LEN: usize = 11 * 1024 * 1024;

/// Serve `store` on a random local port from a background thread.
fn start_server(store: MockStore) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_store(listener, store).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(&ClientConfig::new(format!("http://{addr}")))
}

#[test]
fn demo_endpoints() {
    let addr = start_server(MockStore::default());
    let client = client_for(addr);
    let transport = UreqTransport::new();

    // health: JSON branch
    let health = client.health(&transport).unwrap();
    let health: HealthStatus = serde_json::from_value(health.into_json().unwrap()).unwrap();
    assert_eq!(health.status, "ok");

    // echo round-trips the message
    let echoed = client.echo(&transport, "hi").unwrap();
    assert_eq!(echoed, ApiResponse::Json(serde_json::json!({"message": "hi"})));
}

#[test]
fn job_lifecycle() {
    let mut job = Job::new("job-1", "converted");
    job.latex_id = Some("latex-1".to_string());
    let store = MockStore::default()
        .with_job(job)
        .with_latex("latex-1", "\\int_0^1 x\\,dx");
    let addr = start_server(store);
    let client = client_for(addr);
    let transport = UreqTransport::new();

    // Step 1: list jobs.
    let jobs = client.get_jobs(&transport).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_id, "job-1");
    assert_eq!(jobs[0].latex_id.as_deref(), Some("latex-1"));
    assert!(jobs[0].pdf_id.is_none());

    // Step 2: status.
    let status = client.get_status(&transport, "job-1").unwrap();
    assert_eq!(status.state, "done");
    assert_eq!(status.progress, 100);

    // Step 3: LaTeX source comes back through the raw branch.
    let source = client.get_latex(&transport, "latex-1").unwrap();
    assert_eq!(source, "\\int_0^1 x\\,dx");

    // Step 4: compile.
    let ack = client.compile(&transport, "job-1").unwrap();
    assert_eq!(ack.job_id, "job-1");

    // Step 5: the job now carries a pdf id.
    let jobs = client.get_jobs(&transport).unwrap();
    assert_eq!(jobs[0].status, "complete");
    let pdf_id = jobs[0].pdf_id.clone().expect("pdf id after compile");

    // Step 6: download the pdf bytes.
    let pdf = client.get_pdf(&transport, &pdf_id).unwrap();
    assert_eq!(pdf, PLACEHOLDER_PDF);

    // Step 7: compiling an unknown job surfaces the 404 detail.
    let err = client.compile(&transport, "nope").unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), r#"404 Not Found: {"detail":"jobId not found"}"#);
}

#[test]
fn full_pipeline_from_upload() {
    let mut job = Job::new("job-2", "uploaded");
    job.upload_id = Some("upload-2".to_string());
    let addr = start_server(MockStore::default().with_job(job));
    let client = client_for(addr);
    let transport = UreqTransport::new();

    let options = PreprocessOptions {
        denoise: true,
        threshold: Some(180),
        resize: Some(PreprocessResize { width: 1024, height: 768 }),
        ..PreprocessOptions::default()
    };
    assert_eq!(client.preprocess(&transport, "job-2", &options).unwrap().job_id, "job-2");
    assert_eq!(client.get_jobs(&transport).unwrap()[0].status, "ready to convert");

    assert_eq!(client.convert(&transport, "job-2").unwrap().job_id, "job-2");
    let jobs = client.get_jobs(&transport).unwrap();
    assert!(jobs[0].processed_id.is_some());
    let latex_id = jobs[0].latex_id.clone().expect("latex id after convert");
    assert_eq!(client.get_latex(&transport, &latex_id).unwrap(), PLACEHOLDER_LATEX);

    client.compile(&transport, "job-2").unwrap();
    let pdf_id = client.get_jobs(&transport).unwrap()[0].pdf_id.clone().expect("pdf id after compile");
    assert_eq!(client.get_pdf(&transport, &pdf_id).unwrap(), PLACEHOLDER_PDF);

    // Unknown jobs surface the backend's 404 detail at every step.
    let err = client.preprocess(&transport, "nope", &options).unwrap_err();
    assert_eq!(err.status(), Some(404));
    let err = client.convert(&transport, "nope").unwrap_err();
    assert_eq!(err.to_string(), r#"404 Not Found: {"detail":"jobId not found"}"#);
}

#[test]
fn large_bodies_are_read_in_full() {
    let pdf: Vec<u8> = (0..LARGE_BODY_LEN).map(|i| (i % 251) as u8).collect();
    let latex = "x".repeat(LARGE_BODY_LEN);
    let store = MockStore::default()
        .with_pdf("big", pdf.clone())
        .with_latex("big", &latex);
    let addr = start_server(store);
    let client = client_for(addr);
    let transport = UreqTransport::new();

    let fetched = client.get_pdf(&transport, "big").unwrap();
    assert_eq!(fetched.len(), LARGE_BODY_LEN);
    assert!(fetched == pdf, "pdf bytes differ");

    let raw = client
        .request::<serde_json::Value, _>(&transport, "/api/latex/big", RequestOptions::default())
        .unwrap()
        .into_raw()
        .expect("text/plain is returned raw");
    assert_eq!(raw.body.as_ref().map(Vec::len), Some(LARGE_BODY_LEN));
}

#[test]
fn generic_request_branches_on_content_type() {
    let store = MockStore::default().with_latex("l", "plain");
    let addr = start_server(store);
    let client = client_for(addr);
    let transport = UreqTransport::new();

    let json = client
        .request::<serde_json::Value, _>(&transport, "/api/health", RequestOptions::default())
        .unwrap();
    assert!(json.is_json());

    let raw = client
        .request::<serde_json::Value, _>(&transport, "/api/latex/l", RequestOptions::default())
        .unwrap()
        .into_raw()
        .expect("text/plain is returned raw");
    assert_eq!(raw.status, 200);
    assert!(raw.content_type().starts_with("text/plain"));
    assert_eq!(raw.text().unwrap(), "plain");

    let opts = RequestOptions::json(HttpMethod::Post, &serde_json::json!({"message": "raw"})).unwrap();
    let echoed = client.request::<serde_json::Value, _>(&transport, "/api/echo", opts).unwrap();
    assert_eq!(echoed.into_json().unwrap()["message"], "raw");
}

#[test]
fn unknown_route_is_http_error() {
    let addr = start_server(MockStore::default());
    let client = client_for(addr);

    let err = client
        .request::<serde_json::Value, _>(&UreqTransport::new(), "/api/missing", RequestOptions::default())
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, ref status_text, .. } if status_text == "Not Found"));
}
