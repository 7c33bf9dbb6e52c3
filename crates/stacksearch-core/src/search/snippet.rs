//! Snippet Renderer
//!
//! Short body excerpts with the query's words highlighted, plus the display
//! formatting used for scores on the wire.

/// Raw body characters an excerpt is cut from
pub const SNIPPET_CHARS: usize = 200;

/// Characters of a score's string form shown to clients
pub const SCORE_DISPLAY_WIDTH: usize = 5;

const HIGHLIGHT_OPEN: &str = "<b style='color: #464646'>";
const HIGHLIGHT_CLOSE: &str = "</b>";

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Render the start of `body` with tokens that occur in `query` highlighted
///
/// The body is cut to [`SNIPPET_CHARS`] characters before it is split, so the
/// last word may be partial. A token is highlighted when its lowercase form is
/// a substring of the lowercased query. Bodies are already HTML, so token
/// text is passed through as is.
pub fn render_snippet(body: &str, query: &str) -> String {
    let query = query.to_lowercase();
    let excerpt = truncate_chars(body, SNIPPET_CHARS);

    let mut rendered = String::with_capacity(excerpt.len() + 32);
    for (i, token) in excerpt.split_whitespace().enumerate() {
        if i > 0 {
            rendered.push(' ');
        }
        if query.contains(&token.to_lowercase()) {
            rendered.push_str(HIGHLIGHT_OPEN);
            rendered.push_str(token);
            rendered.push_str(HIGHLIGHT_CLOSE);
        } else {
            rendered.push_str(token);
        }
    }
    rendered
}

/// Score as shown to clients: the first five characters of its string form
///
/// This cuts, it does not round: `0.98765` becomes `"0.987"`. Exponents are
/// signed and at least two digits wide, so `5e-5` shows as `"5e-05"`.
pub fn format_score(score: f32) -> String {
    let full = float_repr(score);
    truncate_chars(&full, SCORE_DISPLAY_WIDTH).to_string()
}

/// Shortest round-trip form with a `e-05` / `e+20` style exponent
fn float_repr(value: f32) -> String {
    let shortest = format!("{:?}", value);
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => shortest,
    }
}

/// Raw vote count as shown to clients
pub fn format_votes(votes: f64) -> String {
    votes.to_string()
}
