use anyhow::{Context, Result};

use super::strategy::PromptTemplate;
use super::{ChatCompletion, ChatModel, Message};
use crate::config::SearchConfig;

const GENERATOR_FRAMING: &str = "You are an expert search query generator.\n";

/// Expand a query into raw, newline-separated candidate phrases using the
/// intent's template. The output still needs [`sanitize_phrases`].
pub async fn expand_query(
    model: &dyn ChatModel,
    config: &SearchConfig,
    query: &str,
    template: &PromptTemplate,
) -> Result<String> {
    let request = ChatCompletion {
        messages: vec![
            Message::system(format!("{GENERATOR_FRAMING}{}", template.body)),
            Message::user(format!("Generate 3-15 search phrases for: \"{query}\"")),
        ],
        temperature: config.expansion_temperature,
        max_tokens: config.expansion_max_tokens,
    };

    let raw = model
        .complete(request)
        .await
        .context("Query expansion failed")?;
    Ok(raw.trim().to_string())
}

/// Clean the generator output into an ordered list of search phrases.
///
/// Per line: strip enumeration (`1.`, `2)`) and hyphen bullets, trim, then
/// drop empty lines, lines over `max_phrase_chars`, and lines containing a
/// banned term. At most `max_phrases` survive, in their original order.
/// Applying this to its own output (joined by newlines) is a no-op.
pub fn sanitize_phrases(raw: &str, config: &SearchConfig) -> Vec<String> {
    raw.lines()
        .map(strip_list_markers)
        .filter(|line| {
            let len = line.chars().count();
            len > 0 && len <= config.max_phrase_chars && !contains_banned(line, &config.banned_terms)
        })
        .take(config.max_phrases)
        .map(str::to_string)
        .collect()
}

/// Strip leading list markers until none remain.
fn strip_list_markers(line: &str) -> &str {
    let mut rest = line.trim();
    loop {
        let stripped = strip_enumeration(rest)
            .or_else(|| rest.strip_prefix('-'))
            .map(str::trim);
        match stripped {
            Some(next) => rest = next,
            None => return rest,
        }
    }
}

/// `12.` or `3)` at the start of the line.
fn strip_enumeration(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix('.')
        .or_else(|| line[digits..].strip_prefix(')'))
}

fn contains_banned(line: &str, banned_terms: &[String]) -> bool {
    let lower = line.to_lowercase();
    banned_terms
        .iter()
        .any(|term| lower.contains(&term.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchConfig {
        SearchConfig::default()
    }

    #[test]
    fn test_strips_numbering_and_bullets_and_banned() {
        let input = "1. this blew my mind\n- holy cow\nrepurpose this for short form\n";
        let result = sanitize_phrases(input, &config());
        assert_eq!(result, vec!["this blew my mind", "holy cow"]);
    }

    #[test]
    fn test_parenthesis_enumeration() {
        let result = sanitize_phrases("12) the rule is\n3)my biggest lesson", &config());
        assert_eq!(result, vec!["the rule is", "my biggest lesson"]);
    }

    #[test]
    fn test_number_without_marker_is_kept() {
        let result = sanitize_phrases("2025 will be the year\n10x your revenue", &config());
        assert_eq!(result, vec!["2025 will be the year", "10x your revenue"]);
    }

    #[test]
    fn test_banned_terms_case_insensitive() {
        let input = "great CLIP idea\nShort Form gold\nRePurPose it\nkeep me";
        assert_eq!(sanitize_phrases(input, &config()), vec!["keep me"]);
    }

    #[test]
    fn test_length_bounds() {
        let exactly = "a".repeat(150);
        let too_long = "b".repeat(151);
        let input = format!("\n   \n{exactly}\n{too_long}\n-\n");
        let result = sanitize_phrases(&input, &config());
        assert_eq!(result, vec![exactly]);
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let phrase = "é".repeat(150);
        let result = sanitize_phrases(&phrase, &config());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_caps_at_max_phrases_preserving_order() {
        let input: String = (0..20).map(|i| format!("phrase {i}\n")).collect();
        let result = sanitize_phrases(&input, &config());
        assert_eq!(result.len(), 15);
        assert_eq!(result[0], "phrase 0");
        assert_eq!(result[14], "phrase 14");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let result = sanitize_phrases("holy cow\nholy cow", &config());
        assert_eq!(result, vec!["holy cow", "holy cow"]);
    }

    #[test]
    fn test_empty_output_yields_no_phrases() {
        assert!(sanitize_phrases("", &config()).is_empty());
        assert!(sanitize_phrases("1.\n2)\n- \n", &config()).is_empty());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = "1) 2. nested marker\n- - double bullet\n  3. indented\nplain phrase\n-1. mixed";
        let once = sanitize_phrases(input, &config());
        let twice = sanitize_phrases(&once.join("\n"), &config());
        assert_eq!(once, twice);
        assert_eq!(
            once,
            vec!["nested marker", "double bullet", "indented", "plain phrase", "mixed"]
        );
    }

    #[test]
    fn test_respects_custom_config() {
        let config = SearchConfig {
            max_phrases: 2,
            max_phrase_chars: 5,
            banned_terms: vec!["nope".to_string()],
            ..SearchConfig::default()
        };
        let result = sanitize_phrases("abc\nnope\nabcdef\nclip\nxyz", &config);
        assert_eq!(result, vec!["abc", "clip"]);
    }
}
