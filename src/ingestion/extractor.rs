//! Knowledge graph extraction from raw text via the language model.
//!
//! The model is asked for a JSON list of `[subject, subject_label, relation,
//! object, object_label]` arrays. Responses are parsed in two stages (locate
//! a fenced code block, then parse the located-or-whole text), malformed
//! elements are dropped rather than failing the batch, and the whole call is
//! retried with exponential backoff.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::fact::{EntityLabel, Fact};
use crate::capability::LanguageModel;
use crate::prompts;
use crate::{Error, Result};

/// Initial backoff delay; doubles on every failed attempt.
const BACKOFF_BASE: Duration = Duration::from_secs(1);

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid regex"));

/// Why a model response could not be turned into facts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("top-level JSON value is not an array")]
    NotAnArray,
}

/// Extract validated facts from `text`, retrying up to `max_retries` model
/// calls. Empty input short-circuits without any call. Exhausting the retry
/// budget returns [`Error::ExtractionFailed`]; callers treat that as
/// non-fatal and continue without graph enrichment.
pub async fn extract_facts(
    text: &str,
    llm: &dyn LanguageModel,
    max_retries: u32,
    call_timeout: Duration,
) -> Result<Vec<Fact>> {
    if text.trim().is_empty() {
        info!("Skipping knowledge graph extraction for empty text");
        return Ok(Vec::new());
    }

    let prompt = prompts::extraction_prompt(text);
    let mut backoff = BACKOFF_BASE;

    for attempt in 1..=max_retries {
        let outcome = match timeout(call_timeout, llm.generate(&prompt)).await {
            Err(_) => Err(Error::LlmTimeout(call_timeout.as_secs())),
            Ok(result) => result,
        };

        match outcome {
            Ok(response) => match parse_fact_payload(&response) {
                Ok(facts) => {
                    info!(
                        "Extracted {} structured facts on attempt {}",
                        facts.len(),
                        attempt
                    );
                    return Ok(facts);
                }
                Err(err) => {
                    warn!("Attempt {}: unusable model payload: {}", attempt, err);
                }
            },
            Err(err) => {
                warn!("Attempt {}: extraction call failed: {}", attempt, err);
            }
        }

        if attempt < max_retries {
            debug!("Backing off {:?} before retrying extraction", backoff);
            sleep(backoff).await;
            backoff *= 2;
        }
    }

    Err(Error::ExtractionFailed {
        attempts: max_retries,
    })
}

/// Parse a model response into facts. Stage one prefers the contents of a
/// fenced code block; stage two parses the located-or-whole text as JSON.
/// Elements that are not 5-element arrays of scalars are dropped silently.
pub fn parse_fact_payload(raw: &str) -> std::result::Result<Vec<Fact>, ParseFailure> {
    let payload = FENCED_BLOCK
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
        .trim();

    let value: Value =
        serde_json::from_str(payload).map_err(|e| ParseFailure::NotJson(e.to_string()))?;

    let items = value.as_array().ok_or(ParseFailure::NotAnArray)?;

    let mut facts = Vec::with_capacity(items.len());
    let mut dropped = 0usize;

    for item in items {
        match fact_from_value(item) {
            Some(fact) => facts.push(fact),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {} malformed fact elements", dropped);
    }

    Ok(facts)
}

fn fact_from_value(value: &Value) -> Option<Fact> {
    let parts = value.as_array()?;
    if parts.len() != 5 {
        return None;
    }

    let fields: Vec<String> = parts.iter().filter_map(scalar_to_string).collect();
    if fields.len() != 5 {
        return None;
    }

    Some(Fact::new(
        fields[0].clone(),
        EntityLabel::parse(&fields[1]),
        fields[2].clone(),
        fields[3].clone(),
        EntityLabel::parse(&fields[4]),
    ))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
