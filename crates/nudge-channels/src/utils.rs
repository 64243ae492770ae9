//! Shared utilities for channel implementations.

/// Split a long message into chunks that respect a platform's byte limit.
///
/// All slice boundaries are aligned to UTF-8 char boundaries to avoid panics
/// on multi-byte content (Cyrillic, CJK, emoji, etc.). Prefers splitting at
/// newline boundaries when possible.
pub fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = chunk_end(text, start, max_len);
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}

/// Largest char boundary at most `max_len` bytes past `start`.
///
/// Always advances by at least one char, even when that char alone is
/// wider than `max_len`.
fn chunk_end(text: &str, start: usize, max_len: usize) -> usize {
    let mut end = (start + max_len).min(text.len());
    while end > start && !text.is_char_boundary(end) {
        end -= 1;
    }
    if end == start {
        end = text[start..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| start + i)
            .unwrap_or(text.len());
    }
    end
}
