//! PII redaction — scans model output for personally identifiable
//! information before it reaches the user.
//!
//! Detectors run in declared order over the progressively redacted text, so
//! a span already replaced by an earlier detector cannot be re-matched by a
//! later one. Placeholders are validated at construction to not match any
//! detector pattern, which makes sanitization idempotent.

use regex::Regex;

use crate::config::RuleSet;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct RedactionSummary {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct SanitizedOutput {
    pub text: String,
    pub redactions: Vec<RedactionSummary>,
}

impl SanitizedOutput {
    pub fn has_redactions(&self) -> bool {
        !self.redactions.is_empty()
    }
}

pub struct OutputSanitizer {
    detectors: Vec<(Regex, String)>,
}

fn placeholder(label: &str) -> String {
    format!("[{} REDACTED]", label)
}

impl OutputSanitizer {
    pub fn new(rules: &RuleSet) -> Result<Self, ConfigError> {
        if rules.pii_detectors.is_empty() {
            return Err(ConfigError::Invalid(
                "PII detector list is empty".to_string(),
            ));
        }

        let mut detectors = Vec::with_capacity(rules.pii_detectors.len());
        for d in &rules.pii_detectors {
            let regex = Regex::new(&d.pattern).map_err(|e| {
                ConfigError::Invalid(format!("detector '{}' has a bad pattern: {}", d.label, e))
            })?;
            detectors.push((regex, d.label.clone()));
        }

        // Idempotence: no pattern may match any placeholder, or a second
        // sanitize pass would rewrite the first pass's output.
        for (regex, label) in &detectors {
            for (_, other) in &detectors {
                if regex.is_match(&placeholder(other)) {
                    return Err(ConfigError::Invalid(format!(
                        "detector '{}' matches the '{}' placeholder — sanitization would not be idempotent",
                        label, other
                    )));
                }
            }
        }

        Ok(Self { detectors })
    }

    /// Replace every PII match with its `[<LABEL> REDACTED]` placeholder.
    /// Total over any text; clean input passes through unchanged.
    pub fn sanitize(&self, text: &str) -> SanitizedOutput {
        let mut cleaned = text.to_string();
        let mut redactions = Vec::new();

        for (regex, label) in &self.detectors {
            let count = regex.find_iter(&cleaned).count();
            if count > 0 {
                cleaned = regex
                    .replace_all(&cleaned, placeholder(label).as_str())
                    .to_string();
                redactions.push(RedactionSummary {
                    label: label.clone(),
                    count,
                });
            }
        }

        if !redactions.is_empty() {
            let summary: Vec<String> = redactions
                .iter()
                .map(|r| format!("{} {}", r.count, r.label))
                .collect();
            log::info!("[SAFETY] Redacted {}", summary.join(", "));
        }

        SanitizedOutput {
            text: cleaned,
            redactions,
        }
    }
}
