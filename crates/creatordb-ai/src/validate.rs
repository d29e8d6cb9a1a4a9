//! Structural validation of completion output.
//!
//! The provider does not guarantee structural validity, so every response
//! is parsed and checked here before anything is cached. Violations are
//! hard failures carrying the (truncated) raw response for diagnostics;
//! nothing is ever silently coerced.

use crate::error::AnalysisError;
use crate::types::CreatorAnalysis;

/// How many characters of a rejected raw response are preserved.
const RAW_PREVIEW_CHARS: usize = 500;

/// Number of competency entries a valid analysis must carry.
const REQUIRED_COMPETENCIES: usize = 3;

/// Parses and validates a completion into a [`CreatorAnalysis`].
///
/// Accepts an optional Markdown code fence around the JSON body. Checks, in
/// order: well-formed JSON matching the schema (the icon enum fails closed
/// on unknown tags), a non-empty narrative description, exactly three
/// competencies each with name/description/evidence, and a complete unique
/// trait with at least one evidence string.
///
/// # Errors
///
/// Returns [`AnalysisError::Contract`] describing the first violation.
pub fn parse_and_validate(raw: &str) -> Result<CreatorAnalysis, AnalysisError> {
    let body = strip_code_fence(raw.trim());

    let analysis: CreatorAnalysis =
        serde_json::from_str(body).map_err(|e| contract(format!("malformed JSON: {e}"), raw))?;

    if analysis.profile_description.trim().is_empty() {
        return Err(contract("profile_description is empty".to_string(), raw));
    }

    if analysis.competencies.len() != REQUIRED_COMPETENCIES {
        return Err(contract(
            format!(
                "expected exactly {REQUIRED_COMPETENCIES} competencies, got {}",
                analysis.competencies.len()
            ),
            raw,
        ));
    }

    for (i, competency) in analysis.competencies.iter().enumerate() {
        if competency.name.trim().is_empty() {
            return Err(contract(format!("competency {} has an empty name", i + 1), raw));
        }
        if competency.description.trim().is_empty() {
            return Err(contract(
                format!("competency '{}' has an empty description", competency.name),
                raw,
            ));
        }
        if competency.evidence.iter().all(|e| e.trim().is_empty()) {
            return Err(contract(
                format!("competency '{}' has no evidence", competency.name),
                raw,
            ));
        }
    }

    let trait_ = &analysis.unique_trait;
    if trait_.name.trim().is_empty()
        || trait_.description.trim().is_empty()
        || trait_.market_value.trim().is_empty()
    {
        return Err(contract(
            "unique_trait must have name, description, and market_value".to_string(),
            raw,
        ));
    }
    if trait_.evidence.iter().all(|e| e.trim().is_empty()) {
        return Err(contract("unique_trait has no evidence".to_string(), raw));
    }

    Ok(analysis)
}

fn contract(reason: String, raw: &str) -> AnalysisError {
    AnalysisError::Contract {
        reason,
        raw: raw.chars().take(RAW_PREVIEW_CHARS).collect(),
    }
}

/// Strips a surrounding ```/```json fence if the model wrapped its output.
fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
