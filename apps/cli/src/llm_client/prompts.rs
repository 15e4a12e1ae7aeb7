// Shared prompt fragments. Each pipeline stage keeps its own prompts in
// generation/prompts.rs; this file holds the cross-cutting pieces.

/// System prompt for stages whose reply is parsed as JSON.
pub const JSON_ONLY_SYSTEM: &str = "You are a careful engineering analyst. \
    Reply with one valid JSON object and nothing else: \
    no prose before or after it, no markdown code fences, no commentary.";

/// Appended to every stage that makes claims about the contributor.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every achievement must be traceable to the repository signals provided: \
    a commit, a file path, a commit pattern, an impact signal or a pull request. \
    Do NOT invent projects, technologies or numbers that the signals do not support. \
    If a claim cannot be backed by the signals, drop it.";

/// Markdown template every section must follow.
pub const SECTION_TEMPLATE: &str = "\
## <Outcome-focused title>
**Bullet Point:** <one sentence stating the result and its scale> <br />
**Description:** <three to five sentences: context, approach, measurable result>";
