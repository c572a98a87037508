//! Error taxonomy for the mediation core.
//!
//! Validation rejections are deliberately NOT errors — a rejected prompt
//! becomes a blocked chat message, not an `Err`. Errors here are the faults
//! the pipeline must surface visibly: a bad rule file at startup, or the
//! model collaborator failing mid-request.

/// Rule-set loading and validation failures. Fatal at startup — a guard
/// running with a broken rule set is worse than one that refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read rule set {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("rule set is not valid JSON: {0}")]
    Parse(String),

    #[error("invalid rule set: {0}")]
    Invalid(String),
}

/// Faults from the model collaborator (load, generation, loss computation).
///
/// A `Timeout` is a generation error, never a safety bypass — the pipeline
/// must not deliver a timed-out generation as if it had been mitigated and
/// sanitized.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model load failed: {0}")]
    Load(String),

    #[error("inference request failed: {0}")]
    Http(String),

    #[error("inference server returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed inference response: {0}")]
    Malformed(String),

    #[error("generation timed out after {0}s")]
    Timeout(u64),
}
