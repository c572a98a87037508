//! Leakage mitigation — re-generate under a flattened decoding
//! distribution.
//!
//! Elevated temperature, restricted top-k/top-p, and an explicit noise
//! parameter raise the model's loss on its own output, which weakens the
//! membership signal a downstream attacker could read from it. The text is
//! never edited after generation; the mitigation is entirely in how the
//! generation is requested. A failed mitigation propagates — substituting
//! the raw output would be a silent privacy regression.

use crate::error::ModelError;
use crate::model::{GenerationConfig, TextModel};

pub struct MitigationEngine {
    temperature: f64,
    top_k: u32,
    top_p: f64,
}

impl Default for MitigationEngine {
    fn default() -> Self {
        Self {
            temperature: 1.2,
            top_k: 20,
            top_p: 0.8,
        }
    }
}

impl MitigationEngine {
    /// Request a privacy-preserving generation for `prompt`.
    pub async fn mitigate(
        &self,
        model: &dyn TextModel,
        prompt: &str,
        noise_level: f64,
    ) -> Result<String, ModelError> {
        let config = self.flattened_config(noise_level);
        log::info!(
            "[PRIVACY] Mitigation generation (temp {}, top_k {}, top_p {}, noise {})",
            config.temperature,
            config.top_k,
            config.top_p,
            config.noise_level
        );
        model.generate(prompt, &config).await
    }

    fn flattened_config(&self, noise_level: f64) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            noise_level,
            ..GenerationConfig::default()
        }
    }
}
