//! medgate — mediated access to a clinical QA language model.
//!
//! Two independent safety layers wrap every generation:
//! - the security guard (safety/): input validation before the model,
//!   PII redaction after it;
//! - the privacy defense (privacy/): membership-inference risk scoring
//!   and mitigation by flattened-decoding regeneration.
//!
//! `pipeline` composes the layers around a model invocation; `harness`
//! probes the defenses directly for adversarial evaluation. The model
//! itself is an opaque collaborator behind the `model::TextModel` trait.

pub mod config;
pub mod error;
pub mod harness;
pub mod model;
pub mod pipeline;
pub mod privacy;
pub mod safety;
pub mod session;

pub use config::{ModelConfig, PolicyConfig, PrivacyConfig, RuleSet};
pub use error::{ConfigError, ModelError};
pub use harness::AttackHarness;
pub use model::{GenerationConfig, ModelGateway, TextModel};
pub use pipeline::MediationPipeline;
pub use privacy::{MitigationEngine, RiskEstimator, RiskScore};
pub use safety::{InputValidator, OutputSanitizer, ValidationResult};
pub use session::{ChatMessage, Conversation, Role, Session};
