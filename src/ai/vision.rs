use tracing::{debug, instrument};

use crate::ai::common::parse_model_json;
use crate::ai::completion::{ChatMessage, ChatRequest, CompletionClient, ContentPart};
use crate::ai::prompts::{vision_user_prompt, VISION_SYSTEM_PROMPT};
use crate::error::{PipelineError, Stage};
use crate::types::{IdentificationRecord, RequestInput};

pub const VISION_MAX_TOKENS: u32 = 1000;
pub const VISION_TEMPERATURE: f32 = 0.3;

/// Build the multimodal identification request: one text block followed by
/// every image at high detail, in upload order.
pub fn build_vision_request(model: &str, input: &RequestInput) -> ChatRequest {
    let mut parts = Vec::with_capacity(input.images.len() + 1);
    parts.push(ContentPart::text(vision_user_prompt(input)));
    parts.extend(input.images.iter().map(ContentPart::high_detail_image));

    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(VISION_SYSTEM_PROMPT),
            ChatMessage::user_parts(parts),
        ],
        max_tokens: VISION_MAX_TOKENS,
        temperature: VISION_TEMPERATURE,
    }
}

/// Identify the item in `input.images` with the vision model.
#[instrument(level = "debug", skip(client, input), fields(images = input.images.len()))]
pub async fn analyze_images<C>(
    client: &C,
    model: &str,
    input: &RequestInput,
) -> Result<IdentificationRecord, PipelineError>
where
    C: CompletionClient + ?Sized,
{
    let request = build_vision_request(model, input);
    let content = client
        .complete(&request)
        .await
        .map_err(|e| PipelineError::from_completion(Stage::Vision, e))?;
    debug!(content = %content, "vision response");

    parse_model_json(&content).map_err(|failure| PipelineError::parse(Stage::Vision, failure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::completion::{MessageContent, Role};
    use crate::types::fixtures::dpm_input;

    #[test]
    fn request_keeps_image_order_and_detail() {
        let mut input = dpm_input();
        input.images = vec![
            "data:image/png;base64,Zmlyc3Q=".into(),
            "data:image/jpeg;base64,c2Vjb25k".into(),
        ];
        let request = build_vision_request("gpt-4o", &input);

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].role, Role::User);

        let MessageContent::Parts(parts) = &request.messages[1].content else {
            panic!("vision user message must be multimodal");
        };
        assert_eq!(parts.len(), 3);
        assert!(matches!(parts[0], ContentPart::Text { .. }));
        let urls: Vec<(&str, &str)> = parts[1..]
            .iter()
            .map(|p| match p {
                ContentPart::ImageUrl { image_url } => {
                    (image_url.url.as_str(), image_url.detail.as_str())
                }
                ContentPart::Text { .. } => panic!("unexpected text block"),
            })
            .collect();
        assert_eq!(
            urls,
            vec![
                ("data:image/png;base64,Zmlyc3Q=", "high"),
                ("data:image/jpeg;base64,c2Vjb25k", "high"),
            ]
        );
    }
}
