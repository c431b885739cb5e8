use crate::libfiszki::pytanie::Question;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

pub const QUESTIONS_ENDPOINT: &str = "questions_with_answers/";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Invalid base URL {0:?}")]
    InvalidBaseUrl(String),
}

/// Source of the question set. One call, one request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpQuizApi {
    client: Client,
    endpoint: Url,
}

// FastAPI puts its error text under `detail`.
#[derive(Deserialize)]
struct ApiDetail {
    detail: String,
}

impl HttpQuizApi {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::new(),
            endpoint: endpoint_url(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

pub fn endpoint_url(base_url: &str) -> Result<Url, FetchError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base).map_err(|_| FetchError::InvalidBaseUrl(base_url.to_string()))?;
    base.join(QUESTIONS_ENDPOINT)
        .map_err(|_| FetchError::InvalidBaseUrl(base_url.to_string()))
}

fn api_error(status: StatusCode, body: &str) -> FetchError {
    let message = match serde_json::from_str::<ApiDetail>(body) {
        Ok(ApiDetail { detail }) => detail,
        Err(_) => status.canonical_reason().unwrap_or("unknown status").to_string(),
    };
    FetchError::Api {
        status: status.as_u16(),
        message,
    }
}

pub fn decode_questions(body: &str) -> Result<Vec<Question>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        let now = Instant::now();
        debug!("[Api] GET {}", self.endpoint);

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| {
                error!("[Api] Network error fetching questions: {}", e);
                FetchError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("[Api] Error fetching questions: {}", status);
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let questions = response.json::<Vec<Question>>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Malformed(e.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })?;
        info!(
            "[Api] Fetched {} questions in {} ms.",
            questions.len(),
            now.elapsed().as_millis()
        );
        Ok(questions)
    }
}

/// Replays a question set saved by `pobieracz`.
#[derive(Debug, Clone)]
pub struct FileQuizApi {
    path: PathBuf,
}

impl FileQuizApi {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuizApi for FileQuizApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        debug!("[Api] Reading questions from {:?}", self.path);
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!("[Api] Cannot read {:?}: {}", self.path, e);
            FetchError::Network(format!("{}: {}", self.path.display(), e))
        })?;
        let questions = decode_questions(&body)?;
        info!("[Api] Loaded {} questions from file.", questions.len());
        Ok(questions)
    }
}
