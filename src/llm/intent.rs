use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{ChatCompletion, ChatModel, Message};
use crate::config::SearchConfig;

/// What the user is trying to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Viral, surprising or "best of" moments
    Curation,
    /// Auditing past predictions and claims
    FactCheck,
    /// Disagreement with conventional wisdom
    Contrarian,
    /// Tactical how-to knowledge
    Advice,
    /// Plain topic or entity search
    General,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Curation,
        Intent::FactCheck,
        Intent::Contrarian,
        Intent::Advice,
        Intent::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Curation => "CURATION",
            Intent::FactCheck => "FACT_CHECK",
            Intent::Contrarian => "CONTRARIAN",
            Intent::Advice => "ADVICE",
            Intent::General => "GENERAL",
        }
    }

    /// Coerce a classifier reply onto the enum. Anything unrecognised is `General`.
    pub fn from_reply(reply: &str) -> Self {
        let label = reply
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '`')
            .trim()
            .to_uppercase();

        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == label)
            .unwrap_or(Intent::General)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const CLASSIFICATION_PROMPT: &str = "You are the router of a podcast transcript search engine.\n\
Classify the user's search query into one of these 5 categories:\n\n\
1. \"CURATION\": The user wants \"cool\", \"viral\", \"interesting\", or \"best\" content. Often mentions \"short form\", \"clips\", \"repurpose\".\n\
   - Example: \"cool ideas for short form\", \"best stories\", \"wildest moments\"\n\
2. \"FACT_CHECK\": The user asks \"Did I say...\", \"Was I right...\", \"Predictions I made\".\n\
   - Example: \"predictions I got wrong\", \"did I call the crypto crash\"\n\
3. \"CONTRARIAN\": The user wants moments where the host DISAGREED with popular opinion, conventional wisdom, or common advice.\n\
   - Example: \"disagreed with conventional wisdom\", \"went against the grain\", \"unpopular opinion\"\n\
4. \"ADVICE\": The user wants specific \"how-to\" or tactical advice on a subject.\n\
   - Example: \"how to hire a CEO\", \"advice on burnout\", \"negotiation tactics\"\n\
5. \"GENERAL\": Standard keyword search.\n\
   - Example: \"Airbnb\", \"the host's diet\", \"trends\"\n\n\
Return ONLY the category name (CURATION, FACT_CHECK, CONTRARIAN, ADVICE, or GENERAL).";

/// Classify a query into an [`Intent`]. A failed model call is an error;
/// an unusable reply falls back to `General`.
pub async fn classify(
    model: &dyn ChatModel,
    config: &SearchConfig,
    query: &str,
) -> Result<Intent> {
    let reply = model
        .complete(ChatCompletion {
            messages: vec![Message::system(CLASSIFICATION_PROMPT), Message::user(query)],
            temperature: config.classifier_temperature,
            max_tokens: config.classifier_max_tokens,
        })
        .await
        .context("Intent classification failed")?;

    let intent = Intent::from_reply(&reply);
    tracing::info!("Query \"{query}\" classified as {intent}");
    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reply_exact_names() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_reply(intent.as_str()), intent);
        }
    }

    #[test]
    fn test_from_reply_case_and_whitespace() {
        assert_eq!(Intent::from_reply("  advice \n"), Intent::Advice);
        assert_eq!(Intent::from_reply("fact_check"), Intent::FactCheck);
    }

    #[test]
    fn test_from_reply_uses_first_line_only() {
        assert_eq!(
            Intent::from_reply("CONTRARIAN\nBecause the user wants disagreement"),
            Intent::Contrarian
        );
    }

    #[test]
    fn test_from_reply_strips_quotes_and_period() {
        assert_eq!(Intent::from_reply("\"CURATION\"."), Intent::Curation);
    }

    #[test]
    fn test_from_reply_unknown_falls_back_to_general() {
        assert_eq!(Intent::from_reply(""), Intent::General);
        assert_eq!(Intent::from_reply("FACT CHECK"), Intent::General);
        assert_eq!(Intent::from_reply("The category is ADVICE"), Intent::General);
        assert_eq!(Intent::from_reply("🤷"), Intent::General);
    }

    #[test]
    fn test_serializes_screaming_snake_case() {
        let json = serde_json::to_value(Intent::FactCheck).unwrap();
        assert_eq!(json, "FACT_CHECK");
    }
}
