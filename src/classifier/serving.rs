//! TensorFlow-Serving REST backend.
//!
//! `POST {base}/v1/models/{name}:predict` with `{"instances": [[ids]]}`,
//! answered by `{"predictions": [[p_valid, p_hoax]]}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{InferenceModel, ModelError};
use crate::config::ModelConfig;
use crate::types::TokenSequence;

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [&'a [u32]; 1],
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct ModelStatusResponse {
    #[serde(default)]
    model_version_status: Vec<VersionStatus>,
}

#[derive(Deserialize)]
struct VersionStatus {
    #[serde(default)]
    version: String,
    state: String,
}

/// Remote model served over HTTP.
#[derive(Debug, Clone)]
pub struct ServingModel {
    http: reqwest::Client,
    predict_url: String,
    status_url: String,
}

impl ServingModel {
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        let base = config.serving_url.trim_end_matches('/');

        Ok(Self {
            http,
            predict_url: format!("{}/v1/models/{}:predict", base, config.name),
            status_url: format!("{}/v1/models/{}", base, config.name),
        })
    }

    /// Build the client and verify a model version is AVAILABLE.
    ///
    /// Called once at startup; an error here is fatal.
    pub async fn connect(config: &ModelConfig) -> Result<Self, ModelError> {
        let model = Self::new(config)?;
        let version = model.check_ready().await?;
        info!(
            url = %model.predict_url,
            version = %version,
            "Model serving endpoint ready"
        );
        Ok(model)
    }

    async fn check_ready(&self) -> Result<String, ModelError> {
        let resp = self.http.get(&self.status_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ModelStatusResponse = resp
            .json()
            .await
            .map_err(|e| ModelError::InvalidOutput(format!("model status: {e}")))?;

        parsed
            .model_version_status
            .into_iter()
            .find(|v| v.state.eq_ignore_ascii_case("AVAILABLE"))
            .map(|v| v.version)
            .ok_or_else(|| ModelError::Unavailable("no AVAILABLE model version".to_string()))
    }
}

#[async_trait]
impl InferenceModel for ServingModel {
    async fn predict(&self, sequence: &TokenSequence) -> Result<Vec<f64>, ModelError> {
        let body = PredictRequest {
            instances: [sequence.ids()],
        };
        let resp = self.http.post(&self.predict_url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PredictResponse = resp
            .json()
            .await
            .map_err(|e| ModelError::InvalidOutput(format!("predict response: {e}")))?;

        parsed
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidOutput("empty predictions".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "tf-serving"
    }
}
