use crate::catalog::Category;
use crate::config::ClassifierConfig;
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "MARKSIFT_API_KEY";

/// Minimal projection of an entry sent to the classification service.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyItem {
    pub title: String,
    pub url: String,
}

/// One item of a service response, correlated back to its batch by url.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub url: String,
    pub category: Category,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    items: &'a [ClassifyItem],
}

#[derive(Deserialize)]
struct ClassifyResponse {
    items: Vec<Classification>,
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("classifier returned status {0}")]
    Status(u16),

    #[error("malformed classifier response: {0}")]
    Malformed(String),
}

pub trait Classifier: Send + Sync {
    /// Classify one batch of items. The response is expected to carry one
    /// item per input url; missing items are tolerated by the caller.
    fn classify(&self, items: &[ClassifyItem]) -> Result<Vec<Classification>, ServiceError>;

    fn name(&self) -> &'static str;
}

pub struct HttpClassifier {
    endpoint: String,
    model: Option<String>,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok();
        if api_key.is_none() {
            log::warn!("{API_KEY_ENV} is missing; calling the classifier unauthenticated");
        }

        HttpClassifier {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Classifier for HttpClassifier {
    fn classify(&self, items: &[ClassifyItem]) -> Result<Vec<Classification>, ServiceError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { items });

        if let Some(model) = &self.model {
            req = req.query(&[("model", model.as_str())]);
        }
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key);
        }

        let resp = req.send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        // strict schema: any shape deviation is a hard batch failure
        let body = resp
            .json::<ClassifyResponse>()
            .map_err(|err| ServiceError::Malformed(err.to_string()))?;

        Ok(body.items)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
