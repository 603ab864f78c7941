//! Substitutor: replace placeholder tokens with resolved evidence values.
//!
//! Runs after the level barrier, so every placeholder a step embeds already
//! has evidence (values may be multi-line text; replacement is literal and
//! non-recursive). A missing value here is a scheduler bug, not a user error:
//! the level scheduler guarantees dependencies resolve first.

use thiserror::Error;

use crate::evidence::Evidence;
use crate::graph::placeholder_tokens;
use crate::plan::StepInput;

/// A step was substituted before one of its dependencies resolved.
///
/// Internal contract failure (fatal); never caused by plan content, which is
/// fully validated before execution starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("placeholder {placeholder} substituted before its evidence was recorded")]
pub struct ContractViolation {
    /// The placeholder whose evidence was missing.
    pub placeholder: String,
}

/// Produces the concrete tool input for a step by replacing every placeholder
/// token with its evidence value.
///
/// Text inputs get whole-string replacement; structured inputs are replaced
/// per string leaf. Tokens are replaced longest-first so `#E1` never clobbers
/// a `#E10` occurrence.
pub fn substitute(input: &StepInput, evidence: &Evidence) -> Result<StepInput, ContractViolation> {
    let mut tokens = placeholder_tokens(input);
    tokens.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut resolved: Vec<(String, String)> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let value = evidence
            .value(&token)
            .ok_or_else(|| ContractViolation {
                placeholder: token.clone(),
            })?
            .to_string();
        resolved.push((token, value));
    }

    Ok(match input {
        StepInput::Text(text) => StepInput::Text(replace_all(text, &resolved)),
        StepInput::Structured(value) => StepInput::Structured(replace_value(value, &resolved)),
    })
}

fn replace_all(text: &str, resolved: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (token, value) in resolved {
        out = out.replace(token, value);
    }
    out
}

fn replace_value(value: &serde_json::Value, resolved: &[(String, String)]) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(replace_all(s, resolved)),
        serde_json::Value::Array(items) => serde_json::Value::Array(
            items.iter().map(|v| replace_value(v, resolved)).collect(),
        ),
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), replace_value(v, resolved)))
                .collect(),
        ),
        other => other.clone(),
    }
}
