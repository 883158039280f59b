// src/extraction/prompt.rs

use crate::config::{OPTION_COUNT, QUESTION_LIMIT};

/// Builds the instruction sent to the model, with the document embedded verbatim.
pub fn build_prompt(document_text: &str) -> String {
    format!(
        "Generate exactly {n} multiple-choice questions with {k} options and exactly one correct answer \
         for the following content. Return ONLY a JSON array of objects (no extra commentary). \
         Each object must have the keys: question, options (array of {k} strings), \
         correct_answer (string, identical to one of the options).\n\n\
         Example output format:\n\
         [{{\"question\":\"Q?\",\"options\":[\"A\",\"B\",\"C\",\"D\"],\"correct_answer\":\"A\"}}]\n\n\
         Content:\n\n{content}",
        n = QUESTION_LIMIT,
        k = OPTION_COUNT,
        content = document_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_document_verbatim() {
        let doc = "Line one.\n\n  Indented {braces} and \"quotes\".";
        let prompt = build_prompt(doc);
        assert!(prompt.ends_with(doc));
        assert!(prompt.contains("exactly 10 multiple-choice questions"));
        assert!(prompt.contains("\"correct_answer\":\"A\""));
    }
}
