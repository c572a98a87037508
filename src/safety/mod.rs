//! Security guard — input validation and output sanitization.
//!
//! Every prompt passes through the validator before it reaches the model.
//! Every delivered response passes through the sanitizer after mitigation.
//! Both layers are deliberately simple substring/regex filters: auditable
//! first lines of defense, not semantic classifiers. Paraphrased harmful
//! intent slipping past the keyword list is expected and out of scope.

pub mod input_check;
pub mod redact;

pub use input_check::{InputValidator, ValidationResult};
pub use redact::{OutputSanitizer, RedactionSummary, SanitizedOutput};
