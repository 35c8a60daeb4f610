//! Answer extraction from raw corpus text
//!
//! Search hits come back as the raw record content ("Question: ... Answer: ...").
//! These helpers strip the framing text and leave the bare answer.

/// Separator between question and answer in corpus records
pub const ANSWER_MARKER: &str = "Answer:";

/// Alternate spelling found in some records; checked before `ANSWER_MARKER`.
/// Note the space before the colon.
pub const FINAL_ANSWER_MARKER: &str = "Final answer :";

/// Extract the answer-only part of a record's content.
///
/// Rules, first match wins:
/// 1. text after the first `"Final answer :"`
/// 2. text after the first `"Answer:"`
/// 3. the last non-empty line
pub fn extract_answer(content: &str) -> String {
    if let Some((_, tail)) = content.split_once(FINAL_ANSWER_MARKER) {
        return tail.trim().to_string();
    }

    if let Some((_, tail)) = content.split_once(ANSWER_MARKER) {
        return tail.trim().to_string();
    }

    last_non_empty_line(content).to_string()
}

/// Line boundaries: `\n`, `\r`, vertical tab, form feed, the ASCII
/// file/group/record separators, NEL, and the Unicode line/paragraph separators
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn last_non_empty_line(content: &str) -> &str {
    content
        .trim()
        .split(is_line_break)
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_answer_marker() {
        assert_eq!(extract_answer("blah blah Final answer : 42"), "42");
    }

    #[test]
    fn test_answer_marker() {
        assert_eq!(extract_answer("Q: x\nAnswer: 42"), "42");
    }

    #[test]
    fn test_last_line_fallback() {
        assert_eq!(extract_answer("line1\nline2\n\nline3"), "line3");
        assert_eq!(extract_answer("line1\nline2\n\n   \n"), "line2");
    }

    #[test]
    fn test_last_line_fallback_other_line_breaks() {
        assert_eq!(extract_answer("line1\rline2"), "line2");
        assert_eq!(extract_answer("line1\r\nline2\r\n"), "line2");
        assert_eq!(extract_answer("page one\x0cpage two"), "page two");
        assert_eq!(extract_answer("a\u{2028}b\u{2029}c"), "c");
        assert_eq!(extract_answer("a\u{85}b\x0bc\x1ed"), "d");
    }

    #[test]
    fn test_single_line_without_markers() {
        assert_eq!(extract_answer("  just some text  "), "just some text");
        assert_eq!(extract_answer(""), "");
        assert_eq!(extract_answer(" \n\t\n"), "");
    }

    #[test]
    fn test_final_answer_takes_precedence() {
        let content = "Question: what?\nAnswer: see below\nFinal answer : 7";
        assert_eq!(extract_answer(content), "7");
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(extract_answer("Answer: a Answer: b"), "a Answer: b");
        assert_eq!(
            extract_answer("Final answer : x Final answer : y"),
            "x Final answer : y"
        );
    }

    #[test]
    fn test_marker_spelling_is_exact() {
        // colon spacing and capitalisation are significant
        assert_eq!(extract_answer("Final answer: 9"), "Final answer: 9");
        assert_eq!(extract_answer("q\nanswer: 3"), "answer: 3");
    }

    #[test]
    fn test_multiline_answer_kept_whole() {
        let content = "Question: list two\nAnswer: one\ntwo\n";
        assert_eq!(extract_answer(content), "one\ntwo");
    }
}
