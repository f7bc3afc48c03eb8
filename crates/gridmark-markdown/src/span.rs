/// Split a table line at unescaped pipes.
///
/// A pipe preceded by a backslash is cell content, not a separator. The
/// returned parts are the verbatim texts between separators: the first part is
/// the prefix before the first pipe and the last part is everything after the
/// final pipe (trailing decoration). Joining the parts with `"|"` reproduces
/// the input byte-for-byte.
pub fn split_pipe_spans(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut prev = '\0';
    for ch in line.chars() {
        if ch == '|' && prev != '\\' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
        prev = ch;
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_unescaped_pipes() {
        assert_eq!(
            split_pipe_spans("| a | b |"),
            vec!["", " a ", " b ", ""],
        );
    }

    #[test]
    fn escaped_pipes_stay_inside_spans() {
        assert_eq!(
            split_pipe_spans("| a \\| x | b |"),
            vec!["", " a \\| x ", " b ", ""],
        );
    }

    #[test]
    fn keeps_trailing_decoration() {
        assert_eq!(
            split_pipe_spans("| a | b | <!-- note -->"),
            vec!["", " a ", " b ", " <!-- note -->"],
        );
    }

    #[test]
    fn join_is_the_inverse() {
        for line in ["", "no pipes", "| a | b |", "a \\| b", "|||", "x|"] {
            assert_eq!(split_pipe_spans(line).join("|"), line);
        }
    }
}
