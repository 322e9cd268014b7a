//! Page snapshot sanitization and truncation

/// Default outbound snapshot budget in bytes.
pub const DEFAULT_SNAPSHOT_BUDGET: usize = 5 * 1024;

/// Strip script/style/comment content, collapse whitespace, and
/// hard-truncate to `budget` bytes (on a char boundary) so the outbound
/// request stays bounded no matter how large the page is.
pub fn sanitize_snapshot(html: &str, budget: usize) -> String {
    let stripped = strip_blocks(html);
    let collapsed = collapse_whitespace(&stripped);
    truncate_bytes(&collapsed, budget)
}

fn strip_blocks(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while !rest.is_empty() {
        let next_block = [
            ("<script", "</script>"),
            ("<style", "</style>"),
            ("<!--", "-->"),
        ]
        .into_iter()
        .filter_map(|(open, close)| find_ci(rest, open).map(|at| (at, close)))
        .min_by_key(|(at, _)| *at);

        match next_block {
            Some((at, close)) => {
                out.push_str(&rest[..at]);
                let after = &rest[at..];
                match find_ci(after, close) {
                    Some(end) => rest = &after[end + close.len()..],
                    None => {
                        // Unterminated block: drop the remainder.
                        rest = "";
                    }
                }
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }
    out
}

/// ASCII case-insensitive search returning an offset into `haystack`
/// itself. The needles are pure ASCII, so a hit starts and ends on char
/// boundaries even in multi-byte text.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&at| haystack[at..at + needle.len()].eq_ignore_ascii_case(needle))
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
                in_whitespace = true;
            }
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out.trim().to_string()
}

fn truncate_bytes(text: &str, budget: usize) -> String {
    if text.len() <= budget {
        return text.to_string();
    }
    let mut end = budget;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
