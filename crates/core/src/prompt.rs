//! Final prompt composition.

/// Compose the prompt sent to the model.
///
/// Non-empty preset parts (global default first, then the row's preset)
/// are joined with blank lines and placed before the raw prompt, again
/// separated by a blank line. Both preset parts are trimmed, the row's
/// preset included, so stray cell whitespace never reaches the model. With
/// no preset parts the raw prompt is returned unchanged.
pub fn compose_final_prompt(style_default: &str, style_preset: &str, prompt: &str) -> String {
    let parts: Vec<&str> = [style_default.trim(), style_preset.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        return prompt.to_string();
    }
    format!("{}\n\n{prompt}", parts.join("\n\n"))
}
