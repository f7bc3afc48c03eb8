/// Escape literal pipes in a cell value for embedding in a pipe-row table.
///
/// A `|` already preceded by a backslash counts as escaped and is left alone,
/// so the function is idempotent and never double-escapes.
pub fn escape_pipes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev = '\0';
    for ch in value.chars() {
        if ch == '|' && prev != '\\' {
            out.push('\\');
        }
        out.push(ch);
        prev = ch;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_bare_pipes() {
        assert_eq!(escape_pipes("a|b"), "a\\|b");
        assert_eq!(escape_pipes("||"), "\\|\\|");
    }

    #[test]
    fn never_double_escapes() {
        assert_eq!(escape_pipes("a\\|b"), "a\\|b");
        assert_eq!(escape_pipes(&escape_pipes("x|y\\|z")), "x\\|y\\|z");
    }

    #[test]
    fn leaves_other_text_alone() {
        assert_eq!(escape_pipes("plain \\ text"), "plain \\ text");
        assert_eq!(escape_pipes(""), "");
    }
}
