//! HTML text helpers

/// Escape text for element content and double-quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON safe to embed inside a `<script>` element
pub fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// CSS `linear-gradient` for a `from-[#aaa] to-[#bbb]` style token
///
/// Tokens that name fewer than two colors fall back to the neutral gradient.
pub fn gradient_css(token: &str) -> String {
    let colors: Vec<&str> = token
        .split_whitespace()
        .filter_map(|part| {
            let start = part.find("[#")? + 1;
            let end = part[start..].find(']')? + start;
            let color = &part[start..end];
            let hex = &color[1..];
            (!hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())).then_some(color)
        })
        .collect();

    match colors.as_slice() {
        [from, to, ..] => format!("linear-gradient(to right, {}, {})", from, to),
        _ => "linear-gradient(to right, #334155, #0f172a)".to_string(),
    }
}
