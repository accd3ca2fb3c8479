// Shared prompt fragments and sampling presets.
// Each prompt template lives in advisor/prompts.rs; this file holds cross-cutting pieces.

use super::GenerationConfig;

/// Output-format directive appended to every structured prompt.
pub const JSON_ARRAY_ONLY: &str = "Return ONLY valid JSON array, no other text.";

/// Career recommendations and skill-gap analysis.
pub const STRUCTURED: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 2048,
};

/// Roadmaps carry 8-12 milestones with nested resources, so they get a larger budget.
pub const STRUCTURED_LONG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 3072,
};

pub const CONVERSATIONAL: GenerationConfig = GenerationConfig {
    temperature: 0.8,
    max_output_tokens: 1024,
};
