//! Console driver — a minimal hosting shell for the mediation pipeline.
//!
//! Plain prompts go through the chat pipeline; `:`-commands flip policy
//! toggles or run attack-lab probes. This binary is deliberately thin: all
//! decision logic lives in the library.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use medgate::{
    AttackHarness, MediationPipeline, ModelConfig, ModelGateway, PolicyConfig, PrivacyConfig,
    RiskEstimator, RuleSet, Session,
};

const HELP: &str = "\
commands:
  :security on|off   toggle the security module
  :privacy on|off    toggle the privacy defense
  :demo on|off       toggle demo mode (no model required)
  :mia <text>        membership-inference probe on <text>
  :filter <text>     filter-bypass probe on <text>
  :status            show toggles and history length
  :quit              exit
anything else is sent to the model as a clinical question.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let rules = RuleSet::load_or_default()?;
    let privacy = PrivacyConfig::default();
    let gateway = Arc::new(ModelGateway::new(ModelConfig::from_env()));

    let pipeline = MediationPipeline::new(&rules, &privacy, Arc::clone(&gateway))?;
    let estimator = RiskEstimator::new(&privacy);
    let validator = medgate::InputValidator::new(&rules)?;

    let mut session = Session::new(PolicyConfig::default());

    println!("medgate — secure clinical QA console");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(':') {
            let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
            match cmd {
                "quit" => break,
                "status" => {
                    let p = session.policy;
                    println!(
                        "security={} privacy={} demo={} | {} messages",
                        p.security_enabled,
                        p.privacy_enabled,
                        p.demo_mode,
                        session.conversation.len()
                    );
                }
                "security" => session.policy.security_enabled = arg == "on",
                "privacy" => session.policy.privacy_enabled = arg == "on",
                "demo" => session.policy.demo_mode = arg == "on",
                "mia" => {
                    let harness =
                        AttackHarness::new(&estimator, &validator, &gateway, session.policy);
                    let score = harness.evaluate_membership(arg).await;
                    println!(
                        "membership probability: {:.2}% — {}{}",
                        score.score * 100.0,
                        AttackHarness::verdict(&score),
                        if score.degraded { " (degraded: heuristic fallback)" } else { "" }
                    );
                }
                "filter" => {
                    let harness =
                        AttackHarness::new(&estimator, &validator, &gateway, session.policy);
                    let result = harness.evaluate_filter_bypass(arg);
                    match result.reason {
                        Some(reason) => println!("BLOCKED ({})", reason),
                        None => println!("PASSED (filter failed to block)"),
                    }
                }
                _ => println!("{}", HELP),
            }
            continue;
        }

        match pipeline.respond(&mut session, line).await {
            Ok(msg) => {
                if msg.blocked {
                    println!("[blocked] {}", msg.content);
                } else {
                    println!("{}", msg.content);
                }
            }
            // Generation faults are visible errors; nothing was appended
            // as an assistant message.
            Err(e) => eprintln!("model error: {}", e),
        }
    }

    Ok(())
}
