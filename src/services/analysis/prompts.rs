// Prompt Builders
// Natural-language instructions sent to the collaborator for detection and rewriting

use crate::models::{AnalysisRequest, SupportedLanguage};

/// Used for any language code without a dedicated instruction.
pub const GENERIC_INSTRUCTION: &str = "academic writing";

/// Stylistic instruction for a language. Never fails: unknown codes get the generic one.
pub fn language_instruction(code: &str) -> &'static str {
    match SupportedLanguage::from_code(code) {
        Some(lang) => supported_instruction(lang),
        None => GENERIC_INSTRUCTION,
    }
}

pub fn supported_instruction(lang: SupportedLanguage) -> &'static str {
    match lang {
        SupportedLanguage::En => "Use natural English academic writing conventions",
        SupportedLanguage::De => {
            "Follow German academic style with proper case usage and sentence structure"
        }
        SupportedLanguage::Fr => "Apply French academic register with appropriate verb tenses",
        SupportedLanguage::It => "Use Italian formal academic language with proper subjunctive",
        SupportedLanguage::Es => "Apply Spanish academic conventions with formal register",
        SupportedLanguage::Pl => "Use Polish academic style with proper case endings and aspects",
        SupportedLanguage::Tr => "Apply Turkish academic writing conventions",
    }
}

pub fn detection_prompt(req: &AnalysisRequest) -> String {
    format!(
        r#"Analyze this {language} academic text, written at {level} level, for AI-generated content.
Consider academic writing patterns, vocabulary complexity, and natural flow.

Text: "{text}"

Provide:
1. AI probability (0-100)
2. Confidence level (0-100)
3. Brief analysis explaining your reasoning
4. List of the specific sentences that seem AI-generated

Format your response as JSON with keys: ai_probability, confidence, analysis, flagged_sentences
Return only the JSON object."#,
        language = req.language,
        level = req.academic_level.label(),
        text = req.text,
    )
}

pub fn humanization_prompt(req: &AnalysisRequest) -> String {
    format!(
        r#"Rewrite this {language} academic text so it reads as human-written at {level} level while:
1. Preserving all citations and references exactly
2. Maintaining the original meaning completely
3. Using natural, varied sentence structures
4. Applying {instruction} conventions
5. Avoiding AI-like patterns (repetitive structures, overly formal phrases)

Original text: "{text}"

Provide:
1. Rewritten text
2. List of specific changes made
3. Meaning preservation confirmation

Format as JSON with keys: rewritten_text, changes_made, meaning_preserved
Return only the JSON object."#,
        language = req.language,
        level = req.academic_level.label(),
        instruction = language_instruction(&req.language),
        text = req.text,
    )
}
