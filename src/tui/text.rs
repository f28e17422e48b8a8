//! Text layout helpers for panels and the live region.

/// Count visible character width (single-cell approximation).
pub fn visible_width(s: &str) -> usize {
    s.chars().count()
}

/// Right-pad `s` with spaces to exactly `width` visible cells, clipping if longer.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let clipped = clip_to_width(s, width);
    let pad = width.saturating_sub(visible_width(&clipped));
    format!("{clipped}{}", " ".repeat(pad))
}

/// Wrap every line of `text` to `max_width`, preserving blank lines.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_for_block(line, max_width))
        .collect()
}

/// Keep the newest `max_rows` rows; when rows are dropped the first kept row
/// is replaced by `marker`.
pub fn keep_tail(rows: Vec<String>, max_rows: usize, marker: &str) -> Vec<String> {
    if rows.len() <= max_rows {
        return rows;
    }
    if max_rows == 0 {
        return Vec::new();
    }
    let mut kept = rows[rows.len() - (max_rows - 1)..].to_vec();
    kept.insert(0, marker.to_string());
    kept
}

/// Clip a string to at most `max_width` visible characters.
pub fn clip_to_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Wrap a single line to fit `max_width`.
///
/// This prefers whitespace boundaries when possible and falls back to hard
/// wrapping long words/tokens.
pub fn wrap_for_block(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }
    if line.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = line.chars().collect();
    let mut out = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let end = (start + max_width).min(chars.len());
        if end == chars.len() {
            out.push(chars[start..end].iter().collect());
            break;
        }
        if chars[end].is_whitespace() {
            out.push(chars[start..end].iter().collect());
            start = end;
            while start < chars.len() && chars[start].is_whitespace() {
                start += 1;
            }
            continue;
        }

        let mut split = None;
        for idx in (start + 1..end).rev() {
            if chars[idx].is_whitespace() {
                split = Some(idx);
                break;
            }
        }

        if let Some(split_idx) = split {
            let row: String = chars[start..split_idx].iter().collect();
            out.push(row);
            start = split_idx;
            while start < chars.len() && chars[start].is_whitespace() {
                start += 1;
            }
            continue;
        }

        out.push(chars[start..end].iter().collect());
        start = end;
    }

    if out.is_empty() {
        out.push(String::new());
    }
    out
}
