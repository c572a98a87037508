//! HTTP client for the inference server.
//!
//! Endpoints:
//!   GET  /health    readiness probe, checked once at load
//!   POST /generate  { prompt, ...decoding params } -> { "text": ... }
//!   POST /loss      { text } -> { "loss": ... }
//!
//! The server is an opaque collaborator — swapping the model behind it
//! requires no change here or anywhere upstream.

use serde::Deserialize;
use std::time::Duration;

use super::{GenerationConfig, TextModel};
use crate::config::ModelConfig;
use crate::error::ModelError;

#[derive(Debug)]
pub struct RemoteModel {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

#[derive(Deserialize)]
struct LossResponse {
    loss: f64,
}

impl RemoteModel {
    /// Connect to the inference server and verify it is ready to serve.
    /// A failed health check is a load error, not a generation error.
    pub async fn connect(config: &ModelConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Load(e.to_string()))?;

        let model = Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        };

        let start = std::time::Instant::now();
        let resp = model
            .client
            .get(format!("{}/health", model.base_url))
            .send()
            .await
            .map_err(|e| ModelError::Load(format!("health check failed: {}", e)))?;
        if !resp.status().is_success() {
            return Err(ModelError::Load(format!(
                "health check returned HTTP {}",
                resp.status()
            )));
        }

        log::info!(
            "[MODEL] Connected to {} in {}ms",
            model.base_url,
            start.elapsed().as_millis()
        );
        Ok(model)
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, ModelError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait::async_trait]
impl TextModel for RemoteModel {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, ModelError> {
        let start = std::time::Instant::now();

        let resp = self
            .post_json(
                "/generate",
                serde_json::json!({
                    "prompt": prompt,
                    "max_length": config.max_length,
                    "min_length": config.min_length,
                    "temperature": config.temperature,
                    "top_k": config.top_k,
                    "top_p": config.top_p,
                    "num_beams": config.num_beams,
                    "noise_level": config.noise_level,
                }),
            )
            .await?;

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        log::info!(
            "[MODEL] Generated {} chars in {}ms (temp {}, top_k {}, noise {})",
            body.text.len(),
            start.elapsed().as_millis(),
            config.temperature,
            config.top_k,
            config.noise_level
        );
        Ok(body.text)
    }

    async fn compute_loss(&self, text: &str) -> Result<f64, ModelError> {
        let start = std::time::Instant::now();

        let resp = self
            .post_json("/loss", serde_json::json!({ "text": text }))
            .await?;

        let body: LossResponse = resp
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        log::info!(
            "[MODEL] Loss {:.4} for {} chars in {}ms",
            body.loss,
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(body.loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_response_parses() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"text":"rest and fluids","tokens":12}"#).unwrap();
        assert_eq!(body.text, "rest and fluids");
    }

    #[test]
    fn loss_response_parses() {
        let body: LossResponse = serde_json::from_str(r#"{"loss":3.25}"#).unwrap();
        assert!((body.loss - 3.25).abs() < f64::EPSILON);
    }
}
