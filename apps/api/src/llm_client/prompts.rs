// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds cross-cutting pieces only.

/// Appended to every rubric so the output is a bare JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only, matching the provided schema exactly. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Every rating must be a number inside the stated range.";

/// Joins a rubric with the shared JSON-only instruction.
pub fn with_json_only(rubric: &str) -> String {
    format!("{}\n\n{}", rubric.trim_end(), JSON_ONLY_INSTRUCTION)
}
