// Reply Parser
// Decodes collaborator replies into typed records, falling back to a caller-supplied value

use regex::Regex;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Outcome of decoding a reply. Both variants carry a usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<R> {
    Parsed(R),
    Fallback(R),
}

impl<R> Decoded<R> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback(_))
    }

    pub fn into_inner(self) -> R {
        match self {
            Decoded::Parsed(r) | Decoded::Fallback(r) => r,
        }
    }
}

/// Decode `content` as `T` (field defaults come from `T`'s serde attributes) and map it,
/// or return `fallback` if the reply is not a conforming JSON object.
pub fn decode_or_fallback<T, R, F>(content: &str, map: F, fallback: R) -> Decoded<R>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> R,
{
    match parse_reply::<T>(content) {
        Ok(record) => Decoded::Parsed(map(record)),
        Err(e) => {
            tracing::warn!("[REPLY_PARSER] Falling back, reply not decodable: {}", e);
            Decoded::Fallback(fallback)
        }
    }
}

pub fn parse_reply<T: DeserializeOwned>(content: &str) -> Result<T, String> {
    let json_str = extract_json(strip_code_fence(content.trim()))?;
    serde_json::from_str::<T>(json_str).map_err(|e| format!("JSON parse error: {}", e))
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?\s*```$").expect("static fence pattern")
    })
}

/// Models often wrap JSON in a Markdown fence.
fn strip_code_fence(content: &str) -> &str {
    match fence_regex().captures(content).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().trim(),
        None => content,
    }
}

/// Slice the outermost `{...}` out of the reply.
fn extract_json(content: &str) -> Result<&str, String> {
    if content.starts_with('{') {
        Ok(content)
    } else if let Some(start) = content.find('{') {
        match content.rfind('}') {
            Some(end) if end > start => Ok(&content[start..=end]),
            _ => Err("Invalid JSON response".to_string()),
        }
    } else {
        Err("No JSON in response".to_string())
    }
}

/// Score field: a number, a numeric string ("85", "85%"), or absent/null (0).
pub fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("score out of range")),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("score is not numeric: {:?}", s))),
        Some(other) => Err(de::Error::custom(format!("expected a score, got {}", other))),
    }
}

/// List-of-strings field: absent/null is an empty list.
pub fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
