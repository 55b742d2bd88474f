//! Fixed-window fallback splitter for plain text without speaker data.

/// Split `text` into windows of at most `max_size` characters, each window
/// starting `max_size - overlap` characters after the previous one.
///
/// Whitespace-only windows are dropped. `overlap >= max_size` degrades to a
/// step of one character rather than looping forever.
pub fn split_fixed(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || max_size == 0 {
        return Vec::new();
    }

    let step = max_size.saturating_sub(overlap).max(1);
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + max_size).min(chars.len());
        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim().to_string();
        if !piece.is_empty() {
            pieces.push(piece);
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    pieces
}
