//! Configuration — session policy toggles, externally loadable filter rules,
//! and the tuning constants for the privacy defense and model client.
//!
//! Rule lists are data, not code: the deployed filter vocabulary lives in
//!   `<config_dir>/medgate/rules.json`
//! and extends without a redeploy. The built-in defaults match the original
//! deployment's lists so a missing file still yields a working guard.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The three operator toggles, read at the start of every pipeline request.
/// Changes apply to the next request, never retroactively.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub security_enabled: bool,
    pub privacy_enabled: bool,
    pub demo_mode: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            security_enabled: true,
            privacy_enabled: false,
            demo_mode: false,
        }
    }
}

/// One named PII detector: `pattern` matches are replaced with
/// `[<label> REDACTED]`. Declaration order is application order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiDetector {
    pub label: String,
    pub pattern: String,
}

/// The externally configurable filter vocabulary: jailbreak phrases and
/// unsafe keywords for input validation, PII detectors for output
/// sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub jailbreak_phrases: Vec<String>,
    pub unsafe_keywords: Vec<String>,
    pub pii_detectors: Vec<PiiDetector>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            jailbreak_phrases: vec![
                "ignore previous instructions".to_string(),
                "system prompt".to_string(),
            ],
            unsafe_keywords: [
                "kill", "suicide", "bomb", "poison", "murder", "hack", "bypass",
                "ignore instructions",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            pii_detectors: vec![
                PiiDetector {
                    label: "EMAIL".to_string(),
                    pattern: r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b".to_string(),
                },
                PiiDetector {
                    label: "PHONE".to_string(),
                    pattern: r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b".to_string(),
                },
                PiiDetector {
                    label: "SSN".to_string(),
                    pattern: r"\b\d{3}-\d{2}-\d{4}\b".to_string(),
                },
            ],
        }
    }
}

impl RuleSet {
    /// Default on-disk location for the rule file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("medgate")
            .join("rules.json")
    }

    /// Load a rule set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let rules: RuleSet =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        log::info!(
            "[CONFIG] Loaded rule set from {} ({} phrases, {} keywords, {} detectors)",
            path.display(),
            rules.jailbreak_phrases.len(),
            rules.unsafe_keywords.len(),
            rules.pii_detectors.len()
        );
        Ok(rules)
    }

    /// Load from the default path, falling back to built-in defaults when the
    /// file does not exist. A file that exists but fails to parse is still an
    /// error — a half-read rule set must not silently shrink the vocabulary.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            log::info!(
                "[CONFIG] No rule file at {} — using built-in defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }
}

/// Tuning constants for the privacy defense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyConfig {
    /// Loss-to-probability threshold (θ) for model-mode membership scoring:
    /// `score = 1 / (1 + exp(loss − θ))`. An empirical constant tuned per
    /// model family; the default carries no calibrated meaning.
    pub loss_threshold: f64,

    /// Noise parameter passed to mitigation generations.
    pub noise_level: f64,

    /// Clinical-record markers for the demo-mode heuristic, matched
    /// case-insensitively.
    pub record_markers: Vec<String>,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            loss_threshold: 4.0,
            noise_level: 0.1,
            record_markers: ["Patient", "Diagnosis", "SSN", "MRN"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Remote inference-server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub base_url: String,
    /// Per-request deadline for generation and loss calls.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 90,
        }
    }
}

impl ModelConfig {
    /// Build from environment (`MEDGATE_MODEL_URL`, `MEDGATE_MODEL_TIMEOUT_SECS`),
    /// keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("MEDGATE_MODEL_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(secs) = std::env::var("MEDGATE_MODEL_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.timeout_secs = secs;
            }
        }
        config
    }
}
