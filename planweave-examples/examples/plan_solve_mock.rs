//! Plan-execute-solve example with mock LLM and real (local) tools.
//!
//! The scripted "planner" returns a fixed two-branch plan; the tools are
//! implemented here against the registry; the scripted "solver" answers from
//! the evidence. Shows the full pipeline without any API key.
//! Run: `cargo run -p planweave-examples --example plan_solve_mock`

use std::sync::Arc;

use async_trait::async_trait;
use planweave::tools::{Tool, ToolRegistry};
use planweave::{
    MockLlm, PlanRunner, SchedulerConfig, StepStatus, ToolCallContent, ToolSourceError, ToolSpec,
};

/// Example tool: word count over its input (defined here, not in the framework).
struct WordCount;

#[async_trait]
impl Tool for WordCount {
    fn name(&self) -> &str {
        "word_count"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "word_count".to_string(),
            description: Some("Counts the words in the input text".to_string()),
            input_schema: serde_json::json!({"type": "string"}),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let text = args
            .as_str()
            .ok_or_else(|| ToolSourceError::InvalidInput("expected a string".to_string()))?;
        Ok(ToolCallContent {
            text: text.split_whitespace().count().to_string(),
        })
    }
}

/// Example tool: uppercases its input.
struct Upper;

#[async_trait]
impl Tool for Upper {
    fn name(&self) -> &str {
        "upper"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "upper".to_string(),
            description: Some("Uppercases the input text".to_string()),
            input_schema: serde_json::json!({"type": "string"}),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let text = args
            .as_str()
            .ok_or_else(|| ToolSourceError::InvalidInput("expected a string".to_string()))?;
        Ok(ToolCallContent {
            text: text.to_uppercase(),
        })
    }
}

const SCRIPTED_PLAN: &str = "\
Plan: Uppercase the sentence.
#E1 = upper[the quick brown fox jumps over the lazy dog]
Plan: Count the words in parallel.
#E2 = word_count[the quick brown fox jumps over the lazy dog]
Plan: Combine both results.
#E3 = upper[#E2 words: #E1]
";

#[tokio::main]
async fn main() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WordCount));
    registry.register(Box::new(Upper));

    let llm = Arc::new(MockLlm::with_script(vec![
        SCRIPTED_PLAN.to_string(),
        "The sentence has 9 words; uppercased it reads: THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG."
            .to_string(),
    ]));

    let mut runner = PlanRunner::new(llm, Arc::new(registry), SchedulerConfig::default());

    match runner.run("Uppercase this sentence and count its words").await {
        Ok(outcome) => {
            println!("answer: {}", outcome.answer);
            println!("evidence ({} entries):", outcome.evidence.len());
            for entry in outcome.evidence.entries() {
                println!("  {} = {}[{}] -> {}", entry.step_id, entry.tool_name, entry.input, entry.value);
            }
            let failed = outcome
                .results
                .iter()
                .filter(|r| r.status == StepStatus::Failed)
                .count();
            println!("steps: {} total, {} failed", outcome.results.len(), failed);
        }
        Err(e) => eprintln!("run failed: {}", e),
    }
}
