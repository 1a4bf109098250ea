// Text utilities shared by all formatters: message splitting that respects
// row boundaries, and a monospace code-fence wrapper for platforms that
// support it.

/// Split `text` into chunks no longer than `limit` characters, breaking only
/// at line boundaries. A single line longer than `limit` is truncated rather
/// than split mid-row.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 || text.is_empty() {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line: String = if line.chars().count() > limit {
            line.chars().take(limit).collect()
        } else {
            line.to_string()
        };

        // +1 for the joining newline when current is non-empty.
        let needed = if current.is_empty() {
            line.chars().count()
        } else {
            current.chars().count() + 1 + line.chars().count()
        };

        if needed > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Wrap text in a triple-backtick code block (Discord monospace rendering).
pub fn codeblock(text: &str) -> String {
    format!("```\n{text}\n```")
}

/// Truncate or pad a name to a fixed column width.
pub fn fit(name: &str, width: usize) -> String {
    let truncated: String = name.chars().take(width).collect();
    format!("{truncated:<width$}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
