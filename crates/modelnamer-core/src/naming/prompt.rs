//! Prompts sent to the naming service.

use modelnamer_provider::CatalogModel;
use std::fmt::Write;

/// Human-scaled context window, e.g. `128K tokens` or `1M tokens`.
///
/// Returns `None` when the catalog has no context size.
pub fn format_context_window(max_tokens: i64) -> Option<String> {
    if max_tokens <= 0 {
        return None;
    }
    Some(if max_tokens >= 1_000_000 {
        format!("{}M tokens", max_tokens / 1_000_000)
    } else if max_tokens >= 1_000 {
        format!("{}K tokens", max_tokens / 1_000)
    } else {
        format!("{max_tokens} tokens")
    })
}

/// Comma-separated modalities, `text` when the catalog lists none.
fn format_modalities(modalities: &[String]) -> String {
    if modalities.is_empty() {
        "text".to_string()
    } else {
        modalities.join(", ")
    }
}

/// Prompt asking for the display name of one model.
pub fn single_prompt(model: &CatalogModel) -> String {
    format!(
        r#"You are a model naming expert. Generate a clean, professional display name for an AI model.

Rules:
- Use proper capitalization (GPT-4, Claude 3.5, Llama 3.1, etc.)
- Keep version numbers and important identifiers
- Remove redundant words and technical jargon
- Make it user-friendly but informative
- Maximum 50 characters
- Follow established naming patterns from major providers

Examples:
- ID: "gpt-4o-2024-11-20" → "GPT-4o (2024-11-20)"
- ID: "claude-3-5-sonnet" → "Claude 3.5 Sonnet"
- ID: "llama-3-1-70b-instruct" → "Llama 3.1 70B Instruct"
- ID: "mistral-7b-instruct-v0-3" → "Mistral 7B Instruct v0.3"

Model ID: "{id}"
Description: "{description}"

Generate only the display name, nothing else:"#,
        id = model.id,
        description = model.description_headline(),
    )
}

const GROUP_RULES: &str = r#"NAMING RULES:
1. If one model has provider="pool", give it the simple canonical name (this is the meta-model)
2. For provider-specific variants, add provider name: "GPT-4 (OpenAI)", "GPT-4 (Azure)"
3. For multimodal variants, highlight capabilities: "GPT-4 Vision", "Claude 3.5 Sonnet (Vision)", "Gemini Pro (Audio)"
4. For context window differences, include size when significant: "Claude 3.5 Sonnet (200K)", "GPT-4 Turbo (128K)"
5. For feature variants, highlight differences: "GPT-4 Turbo", "Llama 3.1 Instruct", "Mistral 7B (Quantized)"
6. Keep names under 50 characters
7. Use proper capitalization and formatting
8. Make differences clear and concise
9. Prioritize: modalities > provider > context size > other features

Generate names in this exact format (one per line):
[1] -> Display Name Here
[2] -> Display Name Here
etc."#;

/// Prompt asking for distinguishing names for same-id variants.
///
/// Members are listed at 1-based positions in iteration order; callers map
/// parsed positions back with the same numbering.
pub fn group_prompt<'a>(models: impl IntoIterator<Item = &'a CatalogModel>) -> String {
    let mut prompt = String::from(
        "You are a model naming expert. Generate professional display names for AI models \
         that help users differentiate between variants.\n\nMODELS TO NAME:\n",
    );

    for (i, model) in models.into_iter().enumerate() {
        let context = format_context_window(model.max_tokens).unwrap_or_default();
        let _ = write!(
            prompt,
            r#"[{position}] Model ID: "{id}"
    Base Model: "{base}"
    Provider: "{provider}"
    Route: "{route}"
    Pool: "{pool}"
    Subtype: "{subtype}"
    Input Modalities: {input}
    Output Modalities: {output}
    Context Window: {context}
    Description: "{description}"

"#,
            position = i + 1,
            id = model.id,
            base = model.model,
            provider = model.provider,
            route = model.route,
            pool = model.pool,
            subtype = model.subtype,
            input = format_modalities(&model.input_modalities),
            output = format_modalities(&model.output_modalities),
            context = context,
            description = model.description_headline(),
        );
    }

    prompt.push_str(GROUP_RULES);
    prompt
}
