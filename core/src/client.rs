//! Typed HTTP request builder and response parser for the LaTech API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. The generic contract is split into `build_request`, which produces
//! an `HttpRequest`, and `parse_response`, which consumes an `HttpResponse`
//! and branches on its content type. `request` glues the two together
//! around a `Transport`. Each endpoint repeats that split with its own
//! `build_*` / `parse_*` pair and a transport-driven convenience method.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::transport::Transport;
use crate::types::{EchoMessage, Job, JobResp, PreprocessOptions, StatusResponse};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Outcome of a successful call, tagged by the response's content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// The response declared `application/json` and decoded as `T`.
    Json(T),
    /// Any other content type; the response is handed back unparsed.
    Raw(HttpResponse),
}

impl<T> ApiResponse<T> {
    pub fn is_json(&self) -> bool {
        matches!(self, ApiResponse::Json(_))
    }

    /// The decoded value, or `UnexpectedContentType` for a raw response.
    pub fn into_json(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Json(value) => Ok(value),
            ApiResponse::Raw(response) => Err(ApiError::UnexpectedContentType {
                content_type: response.content_type().to_string(),
            }),
        }
    }

    pub fn into_raw(self) -> Option<HttpResponse> {
        match self {
            ApiResponse::Json(_) => None,
            ApiResponse::Raw(response) => Some(response),
        }
    }
}

/// Stateless client for the LaTech API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Target `base_url + path` with no separator added and no normalization.
    pub fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        HttpRequest {
            method: options.method,
            url: format!("{}{}", self.base_url, path),
            headers: options.headers,
            body: options.body,
        }
    }

    /// Interpret a response: non-2xx fails with `ApiError::Http`, a JSON
    /// content type is decoded as `T`, anything else comes back raw.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
        check_status(&response)?;
        if !response.content_type().contains(JSON_CONTENT_TYPE) {
            return Ok(ApiResponse::Raw(response));
        }
        let body = response
            .body
            .as_deref()
            .ok_or_else(|| ApiError::Decode(ApiError::BodyUnreadable.to_string()))?;
        serde_json::from_slice(body)
            .map(ApiResponse::Json)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Issue one request through `transport` and parse the result.
    pub fn request<T, X>(&self, transport: &X, path: &str, options: RequestOptions) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        X: Transport + ?Sized,
    {
        let response = execute(transport, self.build_request(path, options))?;
        self.parse_response(response)
    }

    // -----------------------------------------------------------------------
    // Jobs
    // -----------------------------------------------------------------------

    pub fn build_get_jobs(&self) -> HttpRequest {
        self.build_request("/api/jobs", RequestOptions::default())
    }

    pub fn parse_get_jobs(&self, response: HttpResponse) -> Result<Vec<Job>, ApiError> {
        self.parse_response::<Vec<Job>>(response)?.into_json()
    }

    pub fn get_jobs<X: Transport + ?Sized>(&self, transport: &X) -> Result<Vec<Job>, ApiError> {
        self.request::<Vec<Job>, X>(transport, "/api/jobs", RequestOptions::default())?
            .into_json()
    }

    pub fn build_get_status(&self, job_id: &str) -> HttpRequest {
        self.build_request(&format!("/api/status/{job_id}"), RequestOptions::default())
    }

    pub fn parse_get_status(&self, response: HttpResponse) -> Result<StatusResponse, ApiError> {
        self.parse_response::<StatusResponse>(response)?.into_json()
    }

    pub fn get_status<X: Transport + ?Sized>(&self, transport: &X, job_id: &str) -> Result<StatusResponse, ApiError> {
        self.parse_get_status(execute(transport, self.build_get_status(job_id))?)
    }

    /// Queue image clean-up for an uploaded job.
    pub fn build_preprocess(&self, job_id: &str, options: &PreprocessOptions) -> Result<HttpRequest, ApiError> {
        Ok(self.build_request(
            &format!("/api/preprocess/{job_id}"),
            RequestOptions::json(HttpMethod::Post, options)?,
        ))
    }

    pub fn parse_preprocess(&self, response: HttpResponse) -> Result<JobResp, ApiError> {
        self.parse_response::<JobResp>(response)?.into_json()
    }

    pub fn preprocess<X: Transport + ?Sized>(
        &self,
        transport: &X,
        job_id: &str,
        options: &PreprocessOptions,
    ) -> Result<JobResp, ApiError> {
        self.parse_preprocess(execute(transport, self.build_preprocess(job_id, options)?)?)
    }

    /// Queue conversion of a preprocessed image into LaTeX.
    pub fn build_convert(&self, job_id: &str) -> HttpRequest {
        self.build_request(&format!("/api/convert/{job_id}"), RequestOptions::new(HttpMethod::Post))
    }

    pub fn parse_convert(&self, response: HttpResponse) -> Result<JobResp, ApiError> {
        self.parse_response::<JobResp>(response)?.into_json()
    }

    pub fn convert<X: Transport + ?Sized>(&self, transport: &X, job_id: &str) -> Result<JobResp, ApiError> {
        self.parse_convert(execute(transport, self.build_convert(job_id))?)
    }

    /// Queue compilation of a job's LaTeX into a PDF.
    pub fn build_compile(&self, job_id: &str) -> HttpRequest {
        self.build_request(&format!("/api/compile/{job_id}"), RequestOptions::new(HttpMethod::Post))
    }

    pub fn parse_compile(&self, response: HttpResponse) -> Result<JobResp, ApiError> {
        self.parse_response::<JobResp>(response)?.into_json()
    }

    pub fn compile<X: Transport + ?Sized>(&self, transport: &X, job_id: &str) -> Result<JobResp, ApiError> {
        self.parse_compile(execute(transport, self.build_compile(job_id))?)
    }

    // -----------------------------------------------------------------------
    // Artifacts
    // -----------------------------------------------------------------------

    pub fn build_get_latex(&self, latex_id: &str) -> HttpRequest {
        self.build_request(&format!("/api/latex/{latex_id}"), RequestOptions::default())
    }

    /// LaTeX source is served as plain text. A JSON string body is accepted
    /// too; any other JSON value is rejected.
    pub fn parse_get_latex(&self, response: HttpResponse) -> Result<String, ApiError> {
        let content_type = response.content_type().to_string();
        match self.parse_response::<Value>(response)? {
            ApiResponse::Raw(raw) => raw.text().map(|text| text.into_owned()),
            ApiResponse::Json(Value::String(source)) => Ok(source),
            ApiResponse::Json(_) => Err(ApiError::UnexpectedContentType { content_type }),
        }
    }

    pub fn get_latex<X: Transport + ?Sized>(&self, transport: &X, latex_id: &str) -> Result<String, ApiError> {
        self.parse_get_latex(execute(transport, self.build_get_latex(latex_id))?)
    }

    pub fn build_get_pdf(&self, pdf_id: &str) -> HttpRequest {
        self.build_request(&format!("/api/pdf/{pdf_id}"), RequestOptions::default())
    }

    pub fn parse_get_pdf(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        let content_type = response.content_type().to_string();
        match self.parse_response::<Value>(response)? {
            ApiResponse::Raw(raw) => raw.body.ok_or(ApiError::BodyUnreadable),
            ApiResponse::Json(_) => Err(ApiError::UnexpectedContentType { content_type }),
        }
    }

    pub fn get_pdf<X: Transport + ?Sized>(&self, transport: &X, pdf_id: &str) -> Result<Vec<u8>, ApiError> {
        self.parse_get_pdf(execute(transport, self.build_get_pdf(pdf_id))?)
    }

    // -----------------------------------------------------------------------
    // Demo endpoints
    // -----------------------------------------------------------------------

    pub fn build_health(&self) -> HttpRequest {
        self.build_request("/api/health", RequestOptions::default())
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<ApiResponse<Value>, ApiError> {
        self.parse_response(response)
    }

    pub fn health<X: Transport + ?Sized>(&self, transport: &X) -> Result<ApiResponse<Value>, ApiError> {
        self.parse_health(execute(transport, self.build_health())?)
    }

    pub fn build_echo(&self, message: &str) -> Result<HttpRequest, ApiError> {
        let body = EchoMessage {
            message: message.to_string(),
        };
        Ok(self.build_request("/api/echo", RequestOptions::json(HttpMethod::Post, &body)?))
    }

    pub fn parse_echo(&self, response: HttpResponse) -> Result<ApiResponse<Value>, ApiError> {
        self.parse_response(response)
    }

    pub fn echo<X: Transport + ?Sized>(&self, transport: &X, message: &str) -> Result<ApiResponse<Value>, ApiError> {
        self.parse_echo(execute(transport, self.build_echo(message)?)?)
    }
}

fn execute<X: Transport + ?Sized>(transport: &X, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    debug!(method = %request.method, url = %request.url, "sending request");
    transport.execute(&request)
}

/// Map a non-2xx response to `ApiError::Http`, using the body as detail and
/// falling back to the status text when the body cannot be read.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_ok() {
        return Ok(());
    }
    let detail = match response.text() {
        Ok(text) => text.into_owned(),
        Err(_) => response.status_text.clone(),
    };
    warn!(status = response.status, detail = %detail, "request failed");
    Err(ApiError::Http {
        status: response.status,
        status_text: response.status_text.clone(),
        detail,
    })
}
