//! Terminal output sanitization
//!
//! Rollout files contain model and tool output verbatim, including whatever
//! escape sequences a command printed. Anything echoed to the terminal by the
//! CLI (previews, cwd, metadata) goes through [`sanitize`] first so that a
//! session log cannot clear the screen, retitle the window or inject links.

/// Remove ANSI escape sequences and control characters from `text`.
///
/// Strips CSI sequences (`ESC [ ... letter`), OSC sequences (`ESC ] ...`
/// terminated by BEL or `ESC \`), lone escapes and every control character
/// except tab, newline and carriage return.
///
/// # Examples
///
/// ```
/// use rollout_reader::utils::terminal::sanitize;
///
/// assert_eq!(sanitize("\x1b[31mfailed\x1b[0m"), "failed");
/// assert_eq!(sanitize("\x1b]0;pwned\x07ok"), "ok");
/// ```
pub fn sanitize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters and intermediates run until the final letter
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() || next == '~' {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// [`sanitize`], then fold line breaks and tabs into spaces for one-line output
pub fn sanitize_line(text: &str) -> String {
    sanitize(text)
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_csi_sequences() {
        assert_eq!(sanitize("\x1b[1;31mError\x1b[0m: build"), "Error: build");
        assert_eq!(sanitize("\x1b[2J\x1b[Hclean"), "clean");
        assert_eq!(sanitize("\x1b[3~del"), "del");
    }

    #[test]
    fn test_sanitize_osc_sequences() {
        assert_eq!(sanitize("\x1b]0;title\x07after"), "after");
        assert_eq!(
            sanitize("\x1b]8;;https://example.com\x1b\\link\x1b]8;;\x1b\\"),
            "link"
        );
    }

    #[test]
    fn test_sanitize_control_characters() {
        assert_eq!(sanitize("bell\x07 back\x08 nul\0"), "bell back nul");
        assert_eq!(sanitize("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn test_sanitize_keeps_unicode() {
        assert_eq!(sanitize("héllo 👋 \x1b[32mok\x1b[0m"), "héllo 👋 ok");
    }

    #[test]
    fn test_sanitize_unterminated_sequences() {
        assert_eq!(sanitize("text\x1b[31"), "text");
        assert_eq!(sanitize("text\x1b]0;never ends"), "text");
        assert_eq!(sanitize("lone\x1b escape"), "lone escape");
    }

    #[test]
    fn test_sanitize_line() {
        assert_eq!(sanitize_line("one\ntwo\tthree\x1b[0m"), "one two three");
    }
}
