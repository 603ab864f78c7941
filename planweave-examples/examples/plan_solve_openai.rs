//! Plan-execute-solve example against a real OpenAI-compatible API.
//!
//! The model plans over two local tools, the scheduler executes the levels,
//! and the same model solves from the evidence. Requires `OPENAI_API_KEY`
//! (read via .env or the environment).
//! Run: `cargo run -p planweave-examples --example plan_solve_openai -- "your task"`

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use planweave::tools::{Tool, ToolRegistry};
use planweave::{ChatOpenAI, PlanRunner, SchedulerConfig, ToolCallContent, ToolSourceError, ToolSpec};

/// Example tool: evaluates a sum of integers like "1 + 2 + 3".
struct SumTool;

#[async_trait]
impl Tool for SumTool {
    fn name(&self) -> &str {
        "sum"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "sum".to_string(),
            description: Some("Adds integers written as e.g. 1 + 2 + 3".to_string()),
            input_schema: serde_json::json!({"type": "string"}),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let text = args
            .as_str()
            .ok_or_else(|| ToolSourceError::InvalidInput("expected a string".to_string()))?;
        let mut total: i64 = 0;
        for part in text.split('+') {
            let n: i64 = part
                .trim()
                .parse()
                .map_err(|_| ToolSourceError::InvalidInput(format!("not an integer: {}", part)))?;
            total += n;
        }
        Ok(ToolCallContent {
            text: total.to_string(),
        })
    }
}

/// Example tool: length of the input in characters.
struct LenTool;

#[async_trait]
impl Tool for LenTool {
    fn name(&self) -> &str {
        "length"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "length".to_string(),
            description: Some("Returns the number of characters in the input".to_string()),
            input_schema: serde_json::json!({"type": "string"}),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let text = args
            .as_str()
            .ok_or_else(|| ToolSourceError::InvalidInput("expected a string".to_string()))?;
        Ok(ToolCallContent {
            text: text.chars().count().to_string(),
        })
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    if env::var("OPENAI_API_KEY").is_err() {
        eprintln!("OPENAI_API_KEY is not set; set it or use the plan_solve_mock example");
        std::process::exit(1);
    }

    let task = env::args()
        .nth(1)
        .unwrap_or_else(|| "Add 17 + 25, then tell me how many characters the result has".to_string());

    let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
    let llm = Arc::new(ChatOpenAI::new(model).with_temperature(0.0));

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SumTool));
    registry.register(Box::new(LenTool));

    let mut runner = PlanRunner::new(llm, Arc::new(registry), SchedulerConfig::default());

    match runner.run(&task).await {
        Ok(outcome) => {
            for entry in outcome.evidence.entries() {
                println!("{} = {}[{}] -> {}", entry.step_id, entry.tool_name, entry.input, entry.value);
            }
            println!("\n{}", outcome.answer);
        }
        Err(e) => eprintln!("run failed: {}", e),
    }
}
