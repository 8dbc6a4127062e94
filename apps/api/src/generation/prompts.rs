// LLM prompt constants for the description-generation module.

/// System prompt for job-description drafting.
pub const DESCRIPTION_SYSTEM: &str =
    "You are a professional HR assistant specializing in writing job descriptions.";
