//! Demo backend — deterministic simulated answers with no model download
//! or inference server. Implements `TextModel` so demo mode flows through
//! the exact same pipeline stages as a real generation.

use super::{GenerationConfig, TextModel};
use crate::error::ModelError;

#[derive(Debug, Default, Clone, Copy)]
pub struct DemoModel;

#[async_trait::async_trait]
impl TextModel for DemoModel {
    async fn generate(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, ModelError> {
        Ok(format!(
            "[DEMO MODE] This is a simulated answer for: '{}'.\n\n\
             In a real deployment the clinical model would analyze the full \
             context. Placeholder medical fact: the patient appears to be \
             exhibiting symptoms consistent with viral infection; antibiotics \
             are not recommended unless bacterial co-infection is present.",
            prompt
        ))
    }

    async fn compute_loss(&self, _text: &str) -> Result<f64, ModelError> {
        // No real model, no real loss. Callers that need a membership score
        // without a model use the estimator's heuristic path instead.
        Err(ModelError::Load(
            "demo backend does not compute loss".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_answers_are_deterministic() {
        let model = DemoModel;
        let config = GenerationConfig::default();
        let a = model.generate("What causes strep throat?", &config).await.unwrap();
        let b = model.generate("What causes strep throat?", &config).await.unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("[DEMO MODE]"));
        assert!(a.contains("What causes strep throat?"));
    }

    #[tokio::test]
    async fn demo_loss_is_unavailable() {
        assert!(DemoModel.compute_loss("anything").await.is_err());
    }
}
