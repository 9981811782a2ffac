//! Per-intent expansion templates.
//!
//! Each intent needs a structurally different lexical expansion: viral
//! moments are found through reaction phrasing, predictions through verbs
//! of betting and accountability, and so on.

use super::intent::Intent;

/// A fixed expansion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub intent: Intent,
    /// Full system-prompt body handed to the phrase generator
    pub body: &'static str,
}

const CURATION: &str = "TARGET: CURATION / HIGH-SIGNAL DISCOVERY
The user is looking for \"gems\" - viral moments, mind-blowing ideas, or unique stories.

CRITICAL RULES:
1. IGNORE META-TERMS: Do NOT use words like \"repurpose\", \"short form\", \"content\", \"clip\", \"video\".
2. NO NUMBERING: Return raw phrases only.
3. FOCUS ON REACTION: Search for phrases the host uses when EXCITED.

Generate 3-15 distinct search phrases that find:
- Strong Reactions: \"this blew my mind\", \"holy cow\", \"I can't believe this\"
- Value Signaling: \"billion dollar idea\", \"best business ever\", \"illegal to know this\"
- Story Hooks: \"let me tell you a story\", \"weirdest thing happened\"

Example Output for \"cool ideas for short form\":
this actually blew my mind
the weirdest way to make money
I have never told anyone this
this is a billion dollar insight
the smartest thing I ever did";

const FACT_CHECK: &str = "TARGET: FACT CHECK / PREDICTIONS
The user is auditing past statements. Focus on accuracy, betting, and predictions.

CRITICAL RULES:
1. NO NUMBERING.
2. Search for the ACT of predicting, not just the topic.

Generate 3-15 distinct search phrases that find:
- Prediction Verbs: \"predict\", \"bet\", \"guarantee\", \"believe\"
- Accountability: \"I was wrong\", \"I nailed this\", \"called it\"
- Timeframes: \"in 5 years\", \"by 2025\", \"next decade\"

Example Output for \"predictions I got wrong\":
I was completely wrong about
my prediction failed
I regret saying that
I lost the bet when
it turned out I was mistaken";

const CONTRARIAN: &str = "TARGET: CONTRARIAN / DISAGREEMENT WITH CONVENTIONAL WISDOM
The user wants moments where the host disagreed with popular opinion or common advice.

CRITICAL RULES:
1. NO NUMBERING.
2. Use SHORT, NATURAL phrases a speaker would actually say MID-SENTENCE.
3. Focus on DISAGREEMENT markers, not formal language.

Generate 3-15 distinct search phrases that find:
- Disagreement: \"everyone's wrong about\", \"that's BS\", \"I disagree\"
- Contrarian markers: \"unpopular opinion\", \"hot take\", \"against the grain\"
- Dismissal of norms: \"the common advice is\", \"people always say but\", \"most experts think\"

Example Output for \"disagreed with conventional wisdom\":
everyone thinks this but
the common advice is wrong
people always say you should
most experts are wrong about
that's complete BS
I disagree with the idea
unpopular opinion but
contrary to what people think";

const ADVICE: &str = "TARGET: TACTICAL ADVICE
The user wants \"How-To\" knowledge. Focus on frameworks, rules, and lessons.

CRITICAL RULES:
1. NO NUMBERING.
2. Search for the LESSON, not the topic keyword alone.

Generate 3-15 distinct search phrases that find:
- Frameworks: \"the rule is\", \"my data shows\", \"the system I use\"
- Imperatives: \"never do this\", \"always hire\", \"start by\"
- Experience: \"my biggest lesson\", \"what I learned from\"

Example Output for \"advice on burnout\":
when you feel burned out
the cure for burnout is
my rule for relaxation
how I manage stress
stop working when";

const GENERAL: &str = "TARGET: GENERAL TOPIC SEARCH
The user wants mentions of a specific entity or topic.

CRITICAL RULES:
1. NO NUMBERING.
2. Place the topic in context.

Generate 3-15 distinct search phrases to find this topic.
- Use synonyms and related concepts.
- Place the topic in context of a sentence.

Example Output for \"Airbnb\":
when Brian Chesky told me
the business model of Airbnb
staying in an Airbnb
vacation rental market
competition for hotels";

impl Intent {
    /// The expansion template for this intent.
    pub fn template(self) -> PromptTemplate {
        let body = match self {
            Intent::Curation => CURATION,
            Intent::FactCheck => FACT_CHECK,
            Intent::Contrarian => CONTRARIAN,
            Intent::Advice => ADVICE,
            Intent::General => GENERAL,
        };
        PromptTemplate { intent: self, body }
    }
}

/// Pick the expansion template for an intent.
pub fn select_prompt(intent: Intent) -> PromptTemplate {
    intent.template()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_intent_has_distinct_template() {
        let bodies: Vec<&str> = Intent::ALL.iter().map(|i| select_prompt(*i).body).collect();
        for (i, a) in bodies.iter().enumerate() {
            for b in bodies.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_template_carries_its_intent() {
        for intent in Intent::ALL {
            assert_eq!(select_prompt(intent).intent, intent);
        }
    }

    #[test]
    fn test_templates_forbid_numbering_and_give_example() {
        for intent in Intent::ALL {
            let body = select_prompt(intent).body;
            assert!(body.contains("NO NUMBERING"), "{intent} lacks numbering rule");
            assert!(body.contains("Example Output"), "{intent} lacks example");
        }
    }

    #[test]
    fn test_general_template_targets_topics() {
        assert!(select_prompt(Intent::General).body.starts_with("TARGET: GENERAL"));
        assert!(select_prompt(Intent::Curation).body.starts_with("TARGET: CURATION"));
    }
}
