//! Boundary-safe excerpt extraction and term highlighting.
//!
//! Extraction slides a fixed-size scan window across the text at
//! half-window stride, scores each position by the number of distinct
//! query terms it contains, and expands the best position out to the
//! requested length, snapping both edges outward to the nearest word or
//! sentence boundary. Highlighting is independent and never affects
//! extraction.

/// Fixed scan-window size in characters, independent of the caller's
/// excerpt length.
pub const SCAN_WINDOW: usize = 120;

/// Marker used when an excerpt does not reach an end of the text.
pub const ELLIPSIS: &str = "...";

/// Characters treated as word/sentence boundaries when snapping excerpt
/// edges. Covers ASCII whitespace/punctuation and their CJK forms.
const BOUNDARY_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', '.', ',', ';', ':', '!', '?', '。', '，', '、', '；', '：', '！', '？',
    '「', '」', '『', '』', '（', '）',
];

fn is_boundary(ch: char) -> bool {
    BOUNDARY_CHARS.contains(&ch)
}

fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}'      // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'    // Extension A
        | '\u{3040}'..='\u{30FF}'    // Hiragana + Katakana
        | '\u{AC00}'..='\u{D7AF}'    // Hangul syllables
    )
}

/// Tokenize a query into lowercase search terms.
///
/// Latin/numeric runs split on whitespace and punctuation; each CJK
/// character stands alone as its own term. Duplicates are dropped,
/// first occurrence order preserved.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String, terms: &mut Vec<String>| {
        if !current.is_empty() {
            if !terms.contains(current) {
                terms.push(current.clone());
            }
            current.clear();
        }
    };

    for ch in query.chars() {
        if is_cjk(ch) {
            flush(&mut current, &mut terms);
            let term = ch.to_string();
            if !terms.contains(&term) {
                terms.push(term);
            }
        } else if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else {
            flush(&mut current, &mut terms);
        }
    }
    flush(&mut current, &mut terms);

    terms
}

/// Extract a bounded excerpt of `text` around the densest cluster of
/// query terms.
///
/// Degenerate cases: text no longer than `max_len` is returned verbatim
/// with no ellipses; a query with no term found anywhere yields a
/// boundary-snapped prefix.
pub fn extract(text: &str, query: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }

    let terms = query_terms(query);
    let best = best_window_start(&chars, &terms);

    match best {
        Some(window_start) => {
            let window_len = SCAN_WINDOW.min(chars.len() - window_start);
            let center = window_start + window_len / 2;

            let half = max_len / 2;
            let mut start = center.saturating_sub(half);
            let mut end = (start + max_len).min(chars.len());
            // Keep the full budget when the window sits near the tail.
            start = end.saturating_sub(max_len);

            // Snap both edges outward to the nearest boundary.
            while start > 0 && !is_boundary(chars[start - 1]) {
                start -= 1;
            }
            while end < chars.len() && !is_boundary(chars[end]) {
                end += 1;
            }

            render(&chars, start, end)
        }
        None => {
            // No term found: boundary-snapped prefix of length <= max_len.
            let mut end = max_len;
            while end > 0 && !is_boundary(chars[end - 1]) {
                end -= 1;
            }
            if end == 0 {
                end = max_len;
            }
            render(&chars, 0, end)
        }
    }
}

/// Score every half-stride window position; highest distinct-term count
/// wins, first position on ties. `None` when no term occurs anywhere.
fn best_window_start(chars: &[char], terms: &[String]) -> Option<usize> {
    if terms.is_empty() {
        return None;
    }

    let stride = (SCAN_WINDOW / 2).max(1);
    let mut best: Option<(usize, usize)> = None; // (score, start)

    let mut pos = 0;
    while pos < chars.len() {
        let end = (pos + SCAN_WINDOW).min(chars.len());
        let window: String = chars[pos..end]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect();
        let score = terms.iter().filter(|t| window.contains(t.as_str())).count();
        if score > 0 && best.map_or(true, |(s, _)| score > s) {
            best = Some((score, pos));
        }
        if end == chars.len() {
            break;
        }
        pos += stride;
    }

    best.map(|(_, start)| start)
}

fn render(chars: &[char], start: usize, end: usize) -> String {
    let body: String = chars[start..end].iter().collect();
    let body = body.trim();

    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.push_str(body);
    if end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Wrap every case-insensitive occurrence of any query term in `**`
/// emphasis markers. Original casing is preserved; overlapping matches
/// take the longest term first.
pub fn highlight(excerpt: &str, query: &str) -> String {
    let mut terms = query_terms(query);
    if terms.is_empty() {
        return excerpt.to_string();
    }
    terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    let chars: Vec<char> = excerpt.chars().collect();
    let lower: Vec<char> = chars.iter().flat_map(|c| c.to_lowercase()).collect();
    // to_lowercase can expand some characters; fall back to per-char
    // comparison only when lengths agree.
    let lower = if lower.len() == chars.len() {
        lower
    } else {
        chars.clone()
    };

    let term_chars: Vec<Vec<char>> = terms.iter().map(|t| t.chars().collect()).collect();

    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let matched = term_chars.iter().find(|t| {
            i + t.len() <= lower.len() && lower[i..i + t.len()] == t[..]
        });
        match matched {
            Some(t) => {
                out.push_str("**");
                out.extend(&chars[i..i + t.len()]);
                out.push_str("**");
                i += t.len();
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}
