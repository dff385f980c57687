/// Grammar token to try when an extension has no grammar of its own in the
/// bundled syntax set.
pub fn grammar_alias(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "ts" | "tsx" | "jsx" | "mjs" | "cjs" => Some("js"),
        "h" | "hpp" | "hxx" => Some("cpp"),
        "scss" | "less" => Some("css"),
        "vue" | "svelte" | "htm" => Some("html"),
        "yml" => Some("yaml"),
        "kt" | "kts" => Some("java"),
        "zsh" | "fish" => Some("sh"),
        "jsonc" => Some("json"),
        _ => None,
    }
}
