// src/extraction/sanitize.rs

use std::sync::LazyLock;

use regex::Regex;

/// Opening or closing Markdown fence, with an optional `json` tag.
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:json)?").expect("valid fence regex"));

/// C0 and C1 control characters, including `\n`, `\r` and `\t`.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}

/// Cleans raw model output so it can be handed to a JSON parser.
///
/// Control characters go first, so removing one can never join backticks
/// into a fence after fences were stripped. Fences are then removed until
/// none remain, which makes the whole function idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut cleaned: String = raw.chars().filter(|c| !is_stripped_control(*c)).collect();

    while FENCE.is_match(&cleaned) {
        cleaned = FENCE.replace_all(&cleaned, "").into_owned();
    }

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_json_fence() {
        let raw = "```json\n[{\"a\": 1}]\n```";
        assert_eq!(sanitize(raw), "[{\"a\": 1}]");
    }

    #[test]
    fn test_strips_bare_fence_and_whitespace() {
        assert_eq!(sanitize("  ```\n{\"questions\": []}\n```  \n"), "{\"questions\": []}");
    }

    #[test]
    fn test_strips_control_characters() {
        let raw = "[\u{0000}{\"q\":\t\"x\u{0007}\"}\r\n\u{0085}]\u{009F}";
        assert_eq!(sanitize(raw), "[{\"q\":\"x\"}]");
    }

    #[test]
    fn test_keeps_ordinary_unicode() {
        assert_eq!(sanitize("\"café ñ 東京\""), "\"café ñ 東京\"");
    }

    #[test]
    fn test_control_char_cannot_assemble_a_fence() {
        // "``" + newline + "`" becomes a fence once the newline is gone.
        let raw = "``\n`json[1]";
        let once = sanitize(raw);
        assert_eq!(once, "[1]");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "```json\n[1, 2]\n```",
            "\u{0001}  ``````json ```  ",
            "````json``",
            "plain text",
            "",
            "  \t\n ",
        ];
        for raw in samples {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", raw);
        }
    }
}
