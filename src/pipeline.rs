//! Mediation pipeline — the request state machine.
//!
//! Stages per request:
//!   Received -> Validating -> { Blocked | Generating } -> [Mitigating]
//!            -> [Sanitizing] -> Delivered
//!
//! Ordering is fixed: validation always precedes generation, and mitigation
//! (when privacy is on) always precedes sanitization (when security is on),
//! because the sanitizer must see the final candidate text. A blocked
//! request is terminal — its system notice never touches the mitigation or
//! sanitization stages. Generation faults surface as errors and append no
//! assistant message.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{PolicyConfig, PrivacyConfig, RuleSet};
use crate::error::{ConfigError, ModelError};
use crate::model::{DemoModel, GenerationConfig, ModelGateway, TextModel};
use crate::privacy::MitigationEngine;
use crate::safety::{InputValidator, OutputSanitizer};
use crate::session::{ChatMessage, Role, Session};

pub struct MediationPipeline {
    validator: InputValidator,
    sanitizer: OutputSanitizer,
    mitigation: MitigationEngine,
    gateway: Arc<ModelGateway>,
    demo: DemoModel,
    noise_level: f64,
    generation_timeout: Duration,
}

impl MediationPipeline {
    pub fn new(
        rules: &RuleSet,
        privacy: &PrivacyConfig,
        gateway: Arc<ModelGateway>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            validator: InputValidator::new(rules)?,
            sanitizer: OutputSanitizer::new(rules)?,
            mitigation: MitigationEngine::default(),
            gateway,
            demo: DemoModel,
            noise_level: privacy.noise_level,
            generation_timeout: Duration::from_secs(90),
        })
    }

    /// Deadline for each model invocation. A timeout is surfaced as a
    /// generation error, never delivered as output.
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Run one prompt through the full mediation flow and append the
    /// outcome to the session transcript.
    ///
    /// Policy toggles are read once, here — a toggle flipped mid-request
    /// takes effect on the next request.
    pub async fn respond(
        &self,
        session: &mut Session,
        prompt: &str,
    ) -> Result<ChatMessage, ModelError> {
        let policy = session.policy;
        session.conversation.push(Role::User, prompt, false);

        // Validating
        if policy.security_enabled {
            let verdict = self.validator.check(prompt);
            if !verdict.safe {
                let reason = verdict
                    .reason
                    .unwrap_or_else(|| "Request blocked.".to_string());
                log::info!("[PIPELINE] Blocked: {}", reason);
                let msg = session
                    .conversation
                    .push(Role::Assistant, format!("System alert: {}", reason), true);
                return Ok(msg.clone());
            }
        } else {
            log::info!("[PIPELINE] Security disabled — validation skipped");
        }

        // Generating (and Mitigating, when privacy is on)
        let candidate = self.generate_candidate(prompt, &policy).await?;

        // Sanitizing
        let delivered = if policy.security_enabled {
            self.sanitizer.sanitize(&candidate).text
        } else {
            candidate
        };

        let msg = session.conversation.push(Role::Assistant, delivered, false);
        log::info!("[PIPELINE] Delivered message seq {}", msg.seq);
        Ok(msg.clone())
    }

    /// Produce the final candidate text: a standard generation, replaced by
    /// a mitigation generation when the privacy defense is enabled.
    async fn generate_candidate(
        &self,
        prompt: &str,
        policy: &PolicyConfig,
    ) -> Result<String, ModelError> {
        let model: Arc<dyn TextModel> = if policy.demo_mode {
            Arc::new(self.demo)
        } else {
            self.gateway.get_or_load().await?
        };

        let raw = self
            .bounded(model.generate(prompt, &GenerationConfig::default()))
            .await?;

        if !policy.privacy_enabled {
            return Ok(raw);
        }

        // Mitigating: the raw generation is discarded in favor of a fresh
        // one under flattened decoding. No fallback to `raw` on failure.
        log::info!("[PIPELINE] Privacy defense on — replacing raw generation");
        self.bounded(self.mitigation.mitigate(model.as_ref(), prompt, self.noise_level))
            .await
    }

    async fn bounded<F>(&self, fut: F) -> Result<String, ModelError>
    where
        F: std::future::Future<Output = Result<String, ModelError>>,
    {
        tokio::time::timeout(self.generation_timeout, fut)
            .await
            .map_err(|_| ModelError::Timeout(self.generation_timeout.as_secs()))?
    }
}
