//! Keeps player-typed text from wrecking the log: one line in, one line out.

/// Flatten a string for single-line logging. Newlines, carriage returns,
/// tabs and backslashes become their escaped spellings, other control
/// characters become `\xNN`, and anything past the preview cap is dropped
/// behind an ellipsis.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 200;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (seen, ch) in s.chars().enumerate() {
        if seen >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn control_characters_are_spelled_out() {
        assert_eq!(escape_log("take\nall\r\t"), "take\\nall\\r\\t");
        assert_eq!(escape_log("go \x07north"), "go \\x07north");
    }

    #[test]
    fn long_lines_are_cut_with_an_ellipsis() {
        let line = "x".repeat(500);
        let esc = escape_log(&line);
        assert!(esc.ends_with('…'));
        assert!(esc.chars().count() <= 201);
    }
}
