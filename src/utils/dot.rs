//! DOT format helpers for graph visualization.
//!
//! Output of [`MethodGraph::to_dot`](crate::analysis::MethodGraph::to_dot) can be rendered with
//! Graphviz (`dot -Tsvg`).

/// Escapes a string for use inside a quoted DOT label.
///
/// Quotes, backslashes and angle brackets are escaped, newlines become `\n` and carriage
/// returns are dropped.
///
/// # Examples
///
/// ```rust
/// use dexscope::utils::escape_dot;
///
/// assert_eq!(escape_dot("const-string v0, \"hi\""), "const-string v0, \\\"hi\\\"");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            '<' => escaped.push_str("\\<"),
            '>' => escaped.push_str("\\>"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot_plain_mnemonic() {
        assert_eq!(escape_dot("if-eq v0, v1, +7"), "if-eq v0, v1, +7");
    }

    #[test]
    fn test_escape_dot_quotes_and_backslashes() {
        assert_eq!(escape_dot("\"a\\b\""), "\\\"a\\\\b\\\"");
    }

    #[test]
    fn test_escape_dot_line_breaks() {
        assert_eq!(escape_dot("0: nop\r\n1: goto"), "0: nop\\n1: goto");
    }

    #[test]
    fn test_escape_dot_angle_brackets() {
        assert_eq!(escape_dot("<init>"), "\\<init\\>");
    }
}
