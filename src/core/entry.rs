use super::extract::ANSWER_MARKER;

/// Question/answer pair parsed from a record's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
}

impl QaEntry {
    /// Parse raw record content.
    ///
    /// Content is split on the first `"Answer:"`. A leading `"Question:"`
    /// label (any case) is dropped from the question part. Content without
    /// the marker becomes a question with an empty answer.
    pub fn parse(content: &str) -> Self {
        match content.split_once(ANSWER_MARKER) {
            Some((question_part, answer_part)) => Self {
                question: strip_question_label(question_part.trim()).to_string(),
                answer: answer_part.trim().to_string(),
            },
            None => Self {
                question: content.trim().to_string(),
                answer: String::new(),
            },
        }
    }
}

/// Drop everything up to the first colon when the text starts with "question".
/// Text starting with "question" but lacking a colon is returned unchanged.
fn strip_question_label(question_part: &str) -> &str {
    const LABEL: &str = "question";

    let labelled = question_part
        .get(..LABEL.len())
        .map(|head| head.eq_ignore_ascii_case(LABEL))
        .unwrap_or(false);

    if !labelled {
        return question_part;
    }

    match question_part.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => question_part,
    }
}
