//! `layerclaw hook|stats` — learning log commands.

use super::{CliResult, load_config, open_learning, open_memory, print_json};
use clap::Subcommand;
use serde_json::{Map, Value};

#[derive(Subcommand)]
pub enum HookAction {
    /// Open a hook before an action; prints its id
    Pre {
        /// Action label
        action: String,

        /// JSON object with extra context
        #[arg(long)]
        context: Option<String>,
    },

    /// Set the expected outcome of a hook
    Expect {
        id: usize,
        /// Expected outcome (JSON, or plain text)
        value: String,
    },

    /// Record the actual outcome of a hook
    Post {
        id: usize,
        /// Actual outcome (JSON, or plain text)
        value: String,

        /// Mark the action as failed
        #[arg(long)]
        failed: bool,
    },
}

pub fn run(action: HookAction) -> CliResult {
    let config = load_config()?;
    let mut log = open_learning(&config)?;

    match action {
        HookAction::Pre { action, context } => {
            let context = match context {
                Some(raw) => parse_context(&raw)?,
                None => Map::new(),
            };
            let id = log.pre_hook(action, context)?;
            println!("{id}");
        }
        HookAction::Expect { id, value } => {
            log.set_expectation(id, parse_value(&value))?;
        }
        HookAction::Post { id, value, failed } => {
            let before = log.insights().len();
            log.post_hook(id, parse_value(&value), !failed)?;
            if let Some(insight) = log.insights().get(before) {
                println!(
                    "Insight: {} expected {} but got {}",
                    insight.action, insight.expected, insight.actual
                );
            }
        }
    }

    Ok(())
}

pub fn stats(json: bool) -> CliResult {
    let config = load_config()?;
    let memory = open_memory(&config)?;
    let log = open_learning(&config)?;
    let stats = log.stats(memory.stats());

    if json {
        print_json(&stats)?;
        return Ok(());
    }

    println!("Learning Statistics");
    println!("===================");
    println!("  Hooks:          {}", stats.total_hooks);
    println!("  Insights:       {}", stats.total_insights);
    println!("  Layer accesses: {}", stats.total_accesses);
    println!("  Log version:    {}", stats.version);

    Ok(())
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_context(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("--context must be a JSON object".into()),
        Err(e) => Err(format!("Invalid --context JSON: {e}")),
    }
}
