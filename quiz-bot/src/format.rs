//! Reply formatting for Telegram HTML parse mode.
//!
//! Model output is split on triple-backtick fences; every segment is HTML-escaped and segments
//! at odd positions are wrapped in `<pre>`. An unterminated fence is not repaired: the trailing
//! segment is simply treated by its position.

/// Fence delimiter for code blocks in model output.
pub const CODE_FENCE: &str = "```";

/// Escapes `&`, `<` and `>` to HTML entities. `&` goes first so entities are not double-escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Formats model output for sending with HTML parse mode.
pub fn format_message(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for (i, part) in text.split(CODE_FENCE).enumerate() {
        let escaped = escape_html(part);
        if i % 2 == 1 {
            out.push_str("<pre>");
            out.push_str(&escaped);
            out.push_str("</pre>");
        } else {
            out.push_str(&escaped);
        }
    }
    out
}
