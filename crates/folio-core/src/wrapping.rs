//! Plain-text wrapping for titles, previews and descriptions.
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Collapses runs of spaces and tabs into one space but keeps line breaks (CSS `pre-line`).
pub fn pre_line(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

/// Word-wraps a single logical line to `width` columns.
///
/// Words wider than `width` are hard-split. An empty input yields one empty line so paragraph
/// spacing is kept.
pub fn wrap_words(line: &str, width: u16) -> Vec<String> {
    let max_cols = width as usize;
    if max_cols == 0 {
        return vec![line.to_string()];
    }
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_cols = 0usize;

    for word in line.split_whitespace() {
        let word_cols = UnicodeWidthStr::width(word);
        let sep = usize::from(!current.is_empty());
        if current_cols + sep + word_cols <= max_cols {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_cols += sep + word_cols;
            continue;
        }
        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current_cols = 0;
        }
        if word_cols <= max_cols {
            current.push_str(word);
            current_cols = word_cols;
            continue;
        }
        for ch in word.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_cols + w > max_cols && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_cols = 0;
            }
            current.push(ch);
            current_cols += w;
        }
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Wraps `text` with `pre-line` semantics.
pub fn wrap_pre_line(text: &str, width: u16) -> Vec<String> {
    pre_line(text)
        .iter()
        .flat_map(|line| wrap_words(line, width))
        .collect()
}

/// Wraps `text` and keeps at most `max_lines` lines, marking the cut with `…`.
pub fn clamp_lines(text: &str, width: u16, max_lines: usize) -> Vec<String> {
    let mut lines = wrap_words(text, width);
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        if UnicodeWidthStr::width(last.as_str()) < width as usize {
            last.push('…');
        } else {
            *last = crate::render::truncate_with_ellipsis(&format!("{last}…"), width as usize);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_words("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap_words("a b c", 3), vec!["a b", "c"]);
    }

    #[test]
    fn hard_splits_long_words() {
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn pre_line_keeps_breaks_and_collapses_spaces() {
        assert_eq!(pre_line("a   b\n\n  c"), vec!["a b", "", "c"]);
        assert_eq!(wrap_pre_line("one two\nthree", 3).len(), 3);
    }

    #[test]
    fn clamp_marks_the_cut() {
        let lines = clamp_lines("one two three four five", 7, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        assert!(UnicodeWidthStr::width(lines[1].as_str()) <= 7);
    }
}
