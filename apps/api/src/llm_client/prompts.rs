// Cross-cutting prompt fragments shared by every LLM-backed operation.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for operations that must return bare prose.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a precise assistant. \
    Respond ONLY with the requested text. \
    Do NOT use markdown formatting. \
    Do NOT include explanations, labels, or apologies.";
