//! Fake chat-completion upstream speaking the common OpenAI-style envelope.
//! Responses are keyword-routed canned text; token counts are estimated at
//! four characters per token so usage accounting stays plausible.

use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

fn default_model() -> String {
    "fixture-chat".to_string()
}

fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

fn canned_reply(prompt: &str) -> &'static str {
    let prompt = prompt.to_lowercase();
    if prompt.contains("summar") {
        "The union applied for statutory recognition covering the warehouse \
         bargaining unit. The application was accepted, a ballot was ordered, \
         and recognition was awarded after a majority voted in favor."
    } else if prompt.contains("ballot") {
        "A recognition ballot is held when the panel is not satisfied that a \
         majority of the bargaining unit are union members. Recognition \
         requires a majority of votes cast and at least 40% of those eligible."
    } else if prompt.contains("bargaining unit") {
        "The bargaining unit is the group of workers the union seeks to \
         represent. Its composition is agreed between the parties or \
         determined by the panel."
    } else {
        "This service answers questions about statutory union recognition \
         cases. Ask about a case summary, ballots, or bargaining units."
    }
}

/// POST /fixtures/llm/v1/chat/completions
pub async fn chat_completion(Json(request): Json<ChatRequest>) -> Json<Value> {
    let prompt: String = request
        .messages
        .iter()
        .filter(|m| m.role != "assistant")
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let content = canned_reply(&prompt);
    let prompt_tokens = estimate_tokens(&prompt);
    let completion_tokens = estimate_tokens(content);

    Json(json!({
        "id": format!("chatcmpl-{}", Uuid::new_v4()),
        "object": "chat.completion",
        "created": Utc::now().timestamp(),
        "model": request.model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    }))
}
