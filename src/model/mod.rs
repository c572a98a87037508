//! Model collaborator contract and implementations.
//!
//! The pipeline and the privacy defense depend only on the `TextModel`
//! trait — generation and per-token loss — never on a concrete backend.
//! `remote` talks to an inference server over HTTP; `demo` answers
//! deterministically with no model at all; `gateway` owns the lazily
//! initialized shared handle.

pub mod demo;
pub mod gateway;
pub mod remote;

pub use demo::DemoModel;
pub use gateway::ModelGateway;
pub use remote::RemoteModel;

use serde::Serialize;

use crate::error::ModelError;

/// Decoding parameters for one generation request. Defaults follow the
/// production decoding setup: near-greedy sampling tuned for CPU latency.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub max_length: u32,
    pub min_length: u32,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub num_beams: u32,
    /// Distribution-flattening noise; 0.0 means none. Nonzero only for
    /// mitigation generations.
    pub noise_level: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 200,
            min_length: 10,
            temperature: 0.7,
            top_k: 50,
            top_p: 1.0,
            num_beams: 1,
            noise_level: 0.0,
        }
    }
}

/// The generation contract every backend satisfies. Implementations must be
/// safe for concurrent read-only use once constructed.
#[async_trait::async_trait]
pub trait TextModel: Send + Sync + std::fmt::Debug {
    async fn generate(&self, prompt: &str, config: &GenerationConfig)
        -> Result<String, ModelError>;

    /// Per-token negative log-likelihood of `text` under the model, with the
    /// text as both input and target. Lower loss means better fit.
    async fn compute_loss(&self, text: &str) -> Result<f64, ModelError>;
}
