//! Plan parser: raw plan text → ordered list of [`PlanStep`].
//!
//! Grammar: a sequence of step blocks. A block is zero or more free-text
//! rationale lines (conventionally starting with `Plan:`) followed by one
//! evidence line of the form `#id = tool_name[input]`. The input runs to the
//! matching closing bracket and may span lines. A fenced code block around
//! the whole plan is tolerated and stripped.
//!
//! Parsing is pure: no I/O, no async, and the same text always parses to the
//! same steps.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::step::{PlanStep, StepInput};

/// Plan text is unusable; surfaced before any tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An evidence line is missing its tool name, bracketed input, or closing bracket.
    #[error("malformed step at line {line}: {content}")]
    MalformedStep { line: usize, content: String },
    /// The same placeholder id labels two steps.
    #[error("duplicate step id {id} at line {line}")]
    DuplicateStepId { id: String, line: usize },
    /// No evidence line found in the plan text.
    #[error("plan contains no steps")]
    EmptyPlan,
}

/// Matches `#id = <rest>`; the id is the step's evidence placeholder.
fn evidence_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(#[A-Za-z][A-Za-z0-9_]*)\s*=\s*(.*)$").expect("valid regex literal")
    })
}

/// Matches `tool_name[` at the start of an evidence line's right-hand side.
fn tool_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*)\s*\[").expect("valid regex literal"))
}

/// Parses raw plan text into an ordered list of steps.
///
/// # Errors
///
/// [`ParseError::MalformedStep`] for an evidence line without a tool name or
/// with an unterminated input, [`ParseError::DuplicateStepId`] when an id
/// repeats, [`ParseError::EmptyPlan`] when no evidence line exists.
pub fn parse_plan(raw: &str) -> Result<Vec<PlanStep>, ParseError> {
    let lines = strip_code_fence(raw);

    let mut steps: Vec<PlanStep> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut rationale: Vec<String> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let (line_no, line) = lines[i];
        let caps = match evidence_line_re().captures(line) {
            Some(caps) => caps,
            None => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    rationale.push(strip_plan_prefix(trimmed).to_string());
                }
                i += 1;
                continue;
            }
        };

        let id = caps[1].to_string();
        let rhs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let tool_caps =
            tool_open_re()
                .captures(rhs)
                .ok_or_else(|| ParseError::MalformedStep {
                    line: line_no,
                    content: line.trim().to_string(),
                })?;
        let tool_name = tool_caps[1].to_string();
        let open_end = tool_caps.get(0).map(|m| m.end()).unwrap_or(rhs.len());

        let (payload, consumed) = scan_bracketed(&lines, i, &rhs[open_end..]).ok_or_else(|| {
            ParseError::MalformedStep {
                line: line_no,
                content: line.trim().to_string(),
            }
        })?;

        if !seen.insert(id.clone()) {
            return Err(ParseError::DuplicateStepId { id, line: line_no });
        }

        let description = rationale.join(" ").trim().to_string();
        rationale.clear();

        steps.push(PlanStep {
            id,
            description,
            tool_name,
            raw_input: classify_input(&payload),
        });
        i += consumed;
    }

    if steps.is_empty() {
        return Err(ParseError::EmptyPlan);
    }
    Ok(steps)
}

/// Collects (1-based line number, line) pairs, dropping a surrounding
/// markdown code fence when present.
fn strip_code_fence(raw: &str) -> Vec<(usize, &str)> {
    let mut lines: Vec<(usize, &str)> = raw
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .collect();

    let first_content = lines.iter().position(|(_, l)| !l.trim().is_empty());
    if let Some(idx) = first_content {
        if lines[idx].1.trim_start().starts_with("```") {
            lines.remove(idx);
            if let Some(end) = lines.iter().rposition(|(_, l)| l.trim_start().starts_with("```")) {
                lines.remove(end);
            }
        }
    }
    lines
}

/// Strips a leading `Plan:` marker from a rationale line.
fn strip_plan_prefix(line: &str) -> &str {
    let lower = line.to_lowercase();
    if lower.starts_with("plan:") {
        line["plan:".len()..].trim_start()
    } else {
        line
    }
}

/// Scans a bracket-balanced payload starting just after the opening `[`.
///
/// `rest` is the remainder of the evidence line; continuation segments come
/// from subsequent lines. Returns the payload and the number of lines
/// consumed (at least 1), or `None` when the bracket never closes.
fn scan_bracketed(lines: &[(usize, &str)], start: usize, rest: &str) -> Option<(String, usize)> {
    let mut payload = String::new();
    let mut depth = 1usize;
    let mut consumed = 1usize;

    let mut segment = rest;
    loop {
        for c in segment.chars() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        // Anything after the closing bracket on this line is ignored.
                        return Some((payload, consumed));
                    }
                }
                _ => {}
            }
            payload.push(c);
        }

        let next = start + consumed;
        if next >= lines.len() {
            return None;
        }
        payload.push('\n');
        segment = lines[next].1;
        consumed += 1;
    }
}

/// Classifies the bracket payload: a JSON object becomes a structured input;
/// anything else is text, with one pair of surrounding quotes stripped.
fn classify_input(payload: &str) -> StepInput {
    let trimmed = payload.trim();
    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            if value.is_object() {
                return StepInput::Structured(value);
            }
        }
    }
    let text = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    StepInput::Text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STEP_PLAN: &str = "\
Plan: Find out what Rust is.
#E1 = search[what is rust]
Plan: Summarize the finding.
#E2 = summarize[condense this: #E1]
";

    /// **Scenario**: A two-step plan parses into ordered steps with rationale, tool, and input.
    #[test]
    fn parses_two_step_plan() {
        let steps = parse_plan(TWO_STEP_PLAN).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].id, "#E1");
        assert_eq!(steps[0].description, "Find out what Rust is.");
        assert_eq!(steps[0].tool_name, "search");
        assert_eq!(steps[0].raw_input, StepInput::Text("what is rust".to_string()));
        assert_eq!(steps[1].id, "#E2");
        assert_eq!(
            steps[1].raw_input,
            StepInput::Text("condense this: #E1".to_string())
        );
    }

    /// **Scenario**: Parsing the same text twice yields structurally identical steps.
    #[test]
    fn parsing_is_idempotent() {
        let a = parse_plan(TWO_STEP_PLAN).unwrap();
        let b = parse_plan(TWO_STEP_PLAN).unwrap();
        assert_eq!(a, b);
    }

    /// **Scenario**: A JSON object payload becomes a structured input.
    #[test]
    fn structured_input_parses_as_json_object() {
        let steps = parse_plan(r#"#E1 = http_get[{"url": "https://example.com"}]"#).unwrap();
        assert_eq!(
            steps[0].raw_input,
            StepInput::Structured(serde_json::json!({"url": "https://example.com"}))
        );
    }

    /// **Scenario**: A structured payload spanning several lines is consumed to the closing bracket.
    #[test]
    fn multi_line_structured_input() {
        let text = "#E1 = http_post[{\n  \"url\": \"https://example.com\",\n  \"body\": \"hello\"\n}]";
        let steps = parse_plan(text).unwrap();
        match &steps[0].raw_input {
            StepInput::Structured(v) => {
                assert_eq!(v["url"], "https://example.com");
                assert_eq!(v["body"], "hello");
            }
            other => panic!("expected structured input, got {:?}", other),
        }
    }

    /// **Scenario**: A quoted literal input has its surrounding quotes stripped.
    #[test]
    fn quoted_literal_stripped() {
        let steps = parse_plan(r#"#E1 = search["what is rust"]"#).unwrap();
        assert_eq!(steps[0].raw_input, StepInput::Text("what is rust".to_string()));
    }

    /// **Scenario**: A markdown code fence around the plan is stripped before parsing.
    #[test]
    fn code_fence_stripped() {
        let fenced = format!("```\n{}```\n", TWO_STEP_PLAN);
        let steps = parse_plan(&fenced).unwrap();
        assert_eq!(steps.len(), 2);
    }

    /// **Scenario**: A repeated placeholder id is rejected with the offending line number.
    #[test]
    fn duplicate_id_rejected() {
        let text = "#E1 = search[a]\n#E1 = search[b]\n";
        let err = parse_plan(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateStepId {
                id: "#E1".to_string(),
                line: 2
            }
        );
    }

    /// **Scenario**: An evidence line without a bracketed input is malformed.
    #[test]
    fn missing_input_is_malformed() {
        let err = parse_plan("#E1 = search\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedStep { line: 1, .. }));
    }

    /// **Scenario**: An unterminated bracket is malformed, reported at the evidence line.
    #[test]
    fn unterminated_bracket_is_malformed() {
        let err = parse_plan("Plan: x\n#E1 = search[oops\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedStep { line: 2, .. }));
    }

    /// **Scenario**: Text without any evidence line is an empty plan.
    #[test]
    fn no_steps_is_empty_plan() {
        let err = parse_plan("Plan: think hard\nno evidence here\n").unwrap_err();
        assert_eq!(err, ParseError::EmptyPlan);
    }

    /// **Scenario**: Nested brackets inside an input are kept verbatim.
    #[test]
    fn nested_brackets_kept() {
        let steps = parse_plan("#E1 = calculator[sum([1, 2, 3])]").unwrap();
        assert_eq!(
            steps[0].raw_input,
            StepInput::Text("sum([1, 2, 3])".to_string())
        );
    }
}
