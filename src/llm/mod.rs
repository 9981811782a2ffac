//! Language-model and embedding collaborators.
//!
//! Everything that talks to a model goes through the [`ChatModel`] and
//! [`embeddings::Embedder`] traits so the pipeline can run against stubs.

pub mod caption;
pub mod chat;
pub mod embeddings;
pub mod intent;
pub mod query_expand;
pub mod strategy;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One non-streaming chat completion call.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A chat model that returns the text of its first choice.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatCompletion) -> Result<String>;
}
