//! Privacy defense — membership-inference risk estimation and leakage
//! mitigation.
//!
//! The estimator scores how likely a text sample was part of the model's
//! training data; the mitigation engine re-generates answers under a
//! flattened decoding distribution to weaken exactly that signal. This is a
//! heuristic policy layer, not differential privacy.

pub mod membership;
pub mod mitigation;

pub use membership::{RiskEstimator, RiskScore, ScoreMode};
pub use mitigation::MitigationEngine;
