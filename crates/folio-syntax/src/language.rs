//! Fence tag normalization.

/// Maps common fence tags to the token the highlighting backends know.
///
/// Authors write `js`, `jsx`, `ts`, `sh`, `yml` and friends; the backends index syntaxes by
/// extension or name. Unknown tags are passed through lowercased.
pub fn canonical_token(tag: &str) -> String {
    let tag = tag.trim().to_ascii_lowercase();
    let mapped = match tag.as_str() {
        "js" | "jsx" | "mjs" | "cjs" | "javascript" => "js",
        // The default syntax set has no TypeScript grammar; JavaScript is the closest match.
        "ts" | "tsx" | "typescript" => "js",
        "rust" | "rs" => "rs",
        "py" | "python" => "py",
        "sh" | "bash" | "zsh" | "shell" | "console" => "sh",
        "yml" | "yaml" => "yaml",
        "md" | "markdown" => "md",
        "c++" | "cpp" | "cc" | "hpp" => "cpp",
        "cs" | "csharp" | "c#" => "cs",
        "html" | "htm" => "html",
        "golang" | "go" => "go",
        "rb" | "ruby" => "rb",
        other => other,
    };
    mapped.to_string()
}
