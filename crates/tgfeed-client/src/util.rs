//! Outbound message shaping.

/// Chunk `text` so every piece fits within `max_len` bytes.
///
/// Cuts never land inside a UTF-8 scalar, and when the window holds a
/// newline the cut pulls back to just after the last one, so paragraphs
/// survive chunking. The final chunk takes whatever remains.
pub fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut window_end = (start + max_len).min(text.len());
        while !text.is_char_boundary(window_end) {
            window_end -= 1;
        }
        let cut = match text[start..window_end].rfind('\n') {
            Some(i) if window_end < text.len() => start + i + 1,
            _ => window_end,
        };
        chunks.push(&text[start..cut]);
        start = cut;
    }

    chunks
}
