use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::ai::completion::{ChatRequest, CompletionClient};
use crate::error::CompletionError;

/// Completion client that answers from a script and records every request.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a script of successful replies.
    pub fn replying(contents: &[&str]) -> Self {
        Self::new(contents.iter().map(|c| Ok(c.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::Transport("script exhausted".into())))
    }
}

/// Vision model answer for a British DPM field shirt.
pub fn dpm_vision_json() -> Value {
    json!({
        "guessedName": "British Army DPM combat shirt",
        "branchOrNation": "British Army",
        "eraOrDecade": "likely 1990s",
        "itemType": "field shirt",
        "camouflagePattern": "DPM",
        "likelyUseCases": ["hunting", "tramping", "everyday wear"],
        "conditionGuess": "used/very good",
        "isCollectableLikely": false,
        "isLikelyReplica": false,
        "confidence": 0.82,
        "historicalNotes": "Disruptive Pattern Material was standard British issue from the late 1960s.",
        "otherDetails": "Button front, two chest pockets, size label reads 170/104."
    })
}

/// Copy model answer placing the shirt under Field Shirts.
pub fn dpm_copy_json() -> Value {
    json!({
        "suggestedTitle": "British Army DPM Combat Shirt - Used",
        "description": "A genuine British Army surplus DPM combat shirt, well suited to hunting and tramping.\n\nButton front with two chest pockets.",
        "features": ["Hard-wearing poly-cotton fabric", "Two buttoned chest pockets"],
        "tags": ["British Army", "DPM", "field shirt", "hunting", "surplus"],
        "notesForLister": "Check the size label against the staff note.",
        "navPrimary": "Clothing",
        "navSecondary": "Shirts & T-Shirts",
        "navTertiary": "Field Shirts",
        "navPath": "Clothing > Shirts & T-Shirts > Field Shirts",
        "seo": {
            "metaTitle": "British Army DPM Combat Shirt | Genuine Surplus Hunting Shirt",
            "metaDescription": "Genuine British Army DPM combat shirt in used condition. A tough, breathable camouflage layer for hunters, trampers and everyday outdoor wear in NZ.",
            "metaKeywords": ["dpm shirt", "british army shirt", "camo shirt", "hunting shirt", "army surplus"]
        }
    })
}

/// Wrap `content` the way the chat completions endpoint returns it.
pub fn chat_body(content: &str) -> String {
    json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] }).to_string()
}
