use anyhow::{Context, Result};

use super::{ChatCompletion, ChatModel, Message};

/// Write a short social caption (plus hashtags) for a clip's spoken content.
pub async fn generate_caption(model: &dyn ChatModel, content: &str) -> Result<String> {
    let prompt = build_caption_prompt(content);

    let caption = model
        .complete(ChatCompletion {
            messages: vec![Message::user(prompt)],
            temperature: 0.7,
            max_tokens: 100,
        })
        .await
        .context("Caption generation failed")?;

    Ok(caption.trim().to_string())
}

fn build_caption_prompt(content: &str) -> String {
    format!(
        "You are a social media expert.\n\
         Generate a viral TikTok/Reels caption for a video clip with this spoken content:\n\
         \"{content}\"\n\n\
         Rules:\n\
         1. Keep it short (under 2 sentences).\n\
         2. Be punchy and engaging (clickbait is okay but keep it high status).\n\
         3. Include 3-5 relevant hashtags.\n\
         4. Return Output format:\n\
         [Caption]\n\
         [Hashtags]\n\n\
         Example:\n\
         This is actually illegal to know 🤯\n\
         #business #startup #podcast"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_content() {
        let prompt = build_caption_prompt("we sold the company for a billion");
        assert!(prompt.contains("\"we sold the company for a billion\""));
        assert!(prompt.contains("3-5 relevant hashtags"));
    }
}
