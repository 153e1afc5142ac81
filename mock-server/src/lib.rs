use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// Bytes served for every compiled PDF.
pub const PLACEHOLDER_PDF: &[u8] = b"%PDF-1.4\n%mock\n%%EOF\n";

/// Source stored for every converted image.
pub const PLACEHOLDER_LATEX: &str = "\\[ x^2 \\]";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latex_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_id: Option<String>,
}

impl Job {
    pub fn new(job_id: &str, status: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            status: status.to_string(),
            upload_id: None,
            processed_id: None,
            latex_id: None,
            pdf_id: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoMessage {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PreprocessResize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PreprocessOptions {
    #[serde(default = "default_grayscale")]
    pub grayscale: bool,
    #[serde(default)]
    pub denoise: bool,
    pub threshold: Option<u8>,
    pub resize: Option<PreprocessResize>,
}

fn default_grayscale() -> bool {
    true
}

#[derive(Serialize)]
struct JobResp {
    job_id: String,
}

#[derive(Serialize)]
struct StatusResponse {
    state: &'static str,
    progress: u32,
}

/// In-memory contents served by the mock.
#[derive(Default, Debug)]
pub struct MockStore {
    pub jobs: BTreeMap<String, Job>,
    pub latex: HashMap<String, String>,
    pub pdfs: HashMap<String, Vec<u8>>,
}

impl MockStore {
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.insert(job.job_id.clone(), job);
        self
    }

    pub fn with_latex(mut self, latex_id: &str, source: &str) -> Self {
        self.latex.insert(latex_id.to_string(), source.to_string());
        self
    }

    pub fn with_pdf(mut self, pdf_id: &str, bytes: Vec<u8>) -> Self {
        self.pdfs.insert(pdf_id.to_string(), bytes);
        self
    }
}

pub type Db = Arc<RwLock<MockStore>>;

pub fn app() -> Router {
    app_with_store(MockStore::default())
}

pub fn app_with_store(store: MockStore) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/health", get(health))
        .route("/api/echo", post(echo))
        .route("/api/jobs", get(list_jobs))
        .route("/api/status/{job_id}", get(get_status))
        .route("/api/preprocess/{job_id}", post(preprocess))
        .route("/api/convert/{job_id}", post(convert))
        .route("/api/compile/{job_id}", post(compile))
        .route("/api/latex/{latex_id}", get(get_latex))
        .route("/api/pdf/{pdf_id}", get(get_pdf))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_store(listener, MockStore::default()).await
}

pub async fn run_with_store(listener: TcpListener, store: MockStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

/// FastAPI-style `{"detail": ...}` error body.
fn not_found(detail: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "detail": detail }))).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn echo(Json(input): Json<EchoMessage>) -> Json<EchoMessage> {
    Json(input)
}

async fn list_jobs(State(db): State<Db>) -> Json<Vec<Job>> {
    let store = db.read().await;
    Json(store.jobs.values().cloned().collect())
}

// The backend reports every job as finished; the mock does the same.
async fn get_status(Path(_job_id): Path<String>) -> Json<StatusResponse> {
    Json(StatusResponse {
        state: "done",
        progress: 100,
    })
}

async fn preprocess(
    State(db): State<Db>,
    Path(job_id): Path<String>,
    Json(options): Json<PreprocessOptions>,
) -> Response {
    let mut store = db.write().await;
    let Some(job) = store.jobs.get_mut(&job_id) else {
        return not_found("jobId not found");
    };
    let processed_id = Uuid::new_v4().to_string();
    job.processed_id = Some(processed_id.clone());
    job.status = "ready to convert".to_string();
    info!(%job_id, %processed_id, grayscale = options.grayscale, denoise = options.denoise, "preprocessed job");
    Json(JobResp { job_id }).into_response()
}

async fn convert(State(db): State<Db>, Path(job_id): Path<String>) -> Response {
    let mut store = db.write().await;
    let Some(job) = store.jobs.get_mut(&job_id) else {
        return not_found("jobId not found");
    };
    let latex_id = Uuid::new_v4().to_string();
    job.latex_id = Some(latex_id.clone());
    job.status = "compiling".to_string();
    store.latex.insert(latex_id.clone(), PLACEHOLDER_LATEX.to_string());
    info!(%job_id, %latex_id, "converted job");
    Json(JobResp { job_id }).into_response()
}

async fn compile(State(db): State<Db>, Path(job_id): Path<String>) -> Response {
    let mut store = db.write().await;
    let Some(job) = store.jobs.get_mut(&job_id) else {
        return not_found("jobId not found");
    };
    let pdf_id = Uuid::new_v4().to_string();
    job.pdf_id = Some(pdf_id.clone());
    job.status = "complete".to_string();
    store.pdfs.insert(pdf_id.clone(), PLACEHOLDER_PDF.to_vec());
    info!(%job_id, %pdf_id, "compiled job");
    Json(JobResp { job_id }).into_response()
}

async fn get_latex(State(db): State<Db>, Path(latex_id): Path<String>) -> Response {
    let store = db.read().await;
    match store.latex.get(&latex_id) {
        Some(source) => source.clone().into_response(),
        None => not_found("latexId not found"),
    }
}

async fn get_pdf(State(db): State<Db>, Path(pdf_id): Path<String>) -> Response {
    let store = db.read().await;
    match store.pdfs.get(&pdf_id) {
        Some(bytes) => ([(header::CONTENT_TYPE, "application/pdf")], bytes.clone()).into_response(),
        None => not_found("pdfId not found"),
    }
}
