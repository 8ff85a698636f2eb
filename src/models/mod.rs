// Paraphraser Data Models
// Wire types shared by the HTTP layer and the analysis services

use serde::{Deserialize, Serialize};

/// Lowest and highest score any result may carry.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_MIN;
    }
    value.clamp(SCORE_MIN, SCORE_MAX)
}

// ============ Languages ============

/// Languages with a dedicated stylistic instruction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    En,
    De,
    Fr,
    It,
    Es,
    Pl,
    Tr,
}

impl SupportedLanguage {
    pub const ALL: [SupportedLanguage; 7] = [
        Self::En,
        Self::De,
        Self::Fr,
        Self::It,
        Self::Es,
        Self::Pl,
        Self::Tr,
    ];

    /// Exact, case-sensitive lookup; unknown codes yield `None` instead of an error.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "de" => Some(Self::De),
            "fr" => Some(Self::Fr),
            "it" => Some(Self::It),
            "es" => Some(Self::Es),
            "pl" => Some(Self::Pl),
            "tr" => Some(Self::Tr),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
            Self::It => "it",
            Self::Es => "es",
            Self::Pl => "pl",
            Self::Tr => "tr",
        }
    }
}

// ============ Analysis Request ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AcademicLevel {
    HighSchool,
    #[default]
    University,
    Phd,
}

impl AcademicLevel {
    /// Register name used inside prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighSchool => "high school",
            Self::University => "university",
            Self::Phd => "PhD",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_true")]
    pub preserve_citations: bool,
    #[serde(default)]
    pub academic_level: AcademicLevel,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            preserve_citations: true,
            academic_level: AcademicLevel::default(),
        }
    }

    /// Rejects requests that would only waste a collaborator call.
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("text must not be empty".to_string());
        }
        Ok(())
    }
}

// ============ Results ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub ai_probability: f64,
    pub confidence: f64,
    pub analysis: String,
    pub flagged_sentences: Vec<String>,
}

impl DetectionResult {
    /// Neutral verdict used when the collaborator reply cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            ai_probability: 50.0,
            confidence: 70.0,
            analysis: "Analysis completed".to_string(),
            flagged_sentences: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizationResult {
    pub original_text: String,
    pub humanized_text: String,
    pub changes_made: Vec<String>,
    pub meaning_preservation_score: f64,
    pub citations_preserved: bool,
}

impl HumanizationResult {
    /// Echo of the original text, used when the rewrite reply cannot be decoded.
    pub fn fallback(original_text: &str) -> Self {
        Self::unchanged(original_text, "Text processed")
    }

    /// Result for text that scored below the humanization threshold.
    pub fn not_needed(original_text: &str) -> Self {
        Self::unchanged(original_text, "No changes needed - text appears human-written")
    }

    fn unchanged(original_text: &str, note: &str) -> Self {
        Self {
            original_text: original_text.to_string(),
            humanized_text: original_text.to_string(),
            changes_made: vec![note.to_string()],
            meaning_preservation_score: 100.0,
            citations_preserved: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub detection: DetectionResult,
    pub humanized: HumanizationResult,
}

// ============ Service Payloads ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn default_language() -> String {
    "en".to_string()
}
fn default_true() -> bool {
    true
}
