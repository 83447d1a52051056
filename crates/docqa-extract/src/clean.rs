//! Text normalization applied to every extracted document.

/// Collapse whitespace runs into single spaces, strip control characters and trim.
///
/// Punctuation is kept so contexts stay readable for the answering step.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if is_control(c) {
            continue;
        } else {
            if pending_space && !cleaned.is_empty() {
                cleaned.push(' ');
            }
            pending_space = false;
            cleaned.push(c);
        }
    }

    cleaned
}

/// C0 controls and DEL.
fn is_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n\t "), "");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            clean_text("  Chapter 1\n\n  It was   a dark\tnight.  "),
            "Chapter 1 It was a dark night."
        );
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(clean_text("bell\u{7}ring\u{0}\u{7f}s"), "bellrings");
    }

    #[test]
    fn test_keeps_punctuation_and_unicode() {
        assert_eq!(
            clean_text("Café — «quoted», (x+y)=z; ok?"),
            "Café — «quoted», (x+y)=z; ok?"
        );
    }

    #[test]
    fn test_form_feed_between_pages_becomes_space() {
        assert_eq!(clean_text("end of page\u{c}Start of next"), "end of page Start of next");
    }
}
