// Analysis Orchestrator
// Detect, humanize, and the detect-then-maybe-humanize pipeline

use crate::models::{
    clamp_score, AnalysisRequest, AnalysisResult, DetectionResult, HumanizationResult,
};
use crate::services::providers::{ProviderError, TextGenerator};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::prompts::{detection_prompt, humanization_prompt};
use super::reply_parser::{decode_or_fallback, lenient_list, lenient_score};

/// Fixed score reported for a successfully parsed rewrite.
const PARSED_MEANING_PRESERVATION: f64 = 95.0;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("AI detection failed: {0}")]
    Detection(#[source] ProviderError),
    #[error("Humanization failed: {0}")]
    Humanization(#[source] ProviderError),
}

#[derive(Debug, Deserialize)]
struct DetectionReply {
    #[serde(default, deserialize_with = "lenient_score")]
    ai_probability: f64,
    #[serde(default, deserialize_with = "lenient_score")]
    confidence: f64,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    flagged_sentences: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RewriteReply {
    #[serde(default)]
    rewritten_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    changes_made: Vec<String>,
    /// Requested by the prompt; only logged.
    #[serde(default)]
    meaning_preserved: Option<Value>,
}

pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
    humanize_threshold: f64,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, humanize_threshold: f64) -> Self {
        Self {
            generator,
            humanize_threshold,
        }
    }

    pub async fn detect(&self, req: &AnalysisRequest) -> Result<DetectionResult, AnalysisError> {
        let started = Instant::now();
        info!(
            "[ANALYZER] Detect start: chars={}, language={}, model={}",
            req.text.chars().count(),
            req.language,
            self.generator.model()
        );

        let reply = self
            .generator
            .generate(&detection_prompt(req))
            .await
            .map_err(|e| {
                warn!("[ANALYZER] Detect collaborator call failed: {}", e);
                AnalysisError::Detection(e)
            })?;

        let decoded = decode_or_fallback(
            &reply.content,
            |r: DetectionReply| DetectionResult {
                ai_probability: clamp_score(r.ai_probability),
                confidence: clamp_score(r.confidence),
                analysis: r.analysis.unwrap_or_default(),
                flagged_sentences: r.flagged_sentences,
            },
            DetectionResult::fallback(),
        );

        info!(
            fallback = decoded.is_fallback(),
            latency_ms = reply.latency_ms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[ANALYZER] Detect done"
        );
        Ok(decoded.into_inner())
    }

    pub async fn humanize(
        &self,
        req: &AnalysisRequest,
    ) -> Result<HumanizationResult, AnalysisError> {
        let started = Instant::now();
        info!(
            "[ANALYZER] Humanize start: chars={}, language={}, preserve_citations={}",
            req.text.chars().count(),
            req.language,
            req.preserve_citations
        );

        let reply = self
            .generator
            .generate(&humanization_prompt(req))
            .await
            .map_err(|e| {
                warn!("[ANALYZER] Humanize collaborator call failed: {}", e);
                AnalysisError::Humanization(e)
            })?;

        let decoded = decode_or_fallback(
            &reply.content,
            |r: RewriteReply| {
                if let Some(ref confirmation) = r.meaning_preserved {
                    debug!("[ANALYZER] Model meaning_preserved={}", confirmation);
                }
                HumanizationResult {
                    original_text: req.text.clone(),
                    humanized_text: r.rewritten_text.unwrap_or_else(|| req.text.clone()),
                    changes_made: r.changes_made,
                    meaning_preservation_score: PARSED_MEANING_PRESERVATION,
                    citations_preserved: req.preserve_citations,
                }
            },
            HumanizationResult::fallback(&req.text),
        );

        info!(
            fallback = decoded.is_fallback(),
            latency_ms = reply.latency_ms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[ANALYZER] Humanize done"
        );
        Ok(decoded.into_inner())
    }

    /// Detect, then rewrite only when the AI probability is strictly above the threshold.
    pub async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let detection = self.detect(req).await?;

        let humanized = if detection.ai_probability > self.humanize_threshold {
            info!(
                "[ANALYZER] ai_probability={} > threshold={}, humanizing",
                detection.ai_probability, self.humanize_threshold
            );
            self.humanize(req).await?
        } else {
            info!(
                "[ANALYZER] ai_probability={} <= threshold={}, skipping rewrite",
                detection.ai_probability, self.humanize_threshold
            );
            HumanizationResult::not_needed(&req.text)
        };

        Ok(AnalysisResult {
            detection,
            humanized,
        })
    }
}
