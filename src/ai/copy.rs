use tracing::{debug, instrument, warn};

use crate::ai::common::parse_model_json;
use crate::ai::completion::{ChatMessage, ChatRequest, CompletionClient};
use crate::ai::prompts::{copy_system_prompt, copy_user_prompt};
use crate::error::{ParseFailure, PipelineError, Stage};
use crate::taxonomy::repair_navigation;
use crate::types::{CatalogCopy, IdentificationRecord, ListingMetadata};

pub const COPY_MAX_TOKENS: u32 = 2000;
pub const COPY_TEMPERATURE: f32 = 0.7;

pub const TAG_RANGE: std::ops::RangeInclusive<usize> = 4..=10;
pub const META_KEYWORD_RANGE: std::ops::RangeInclusive<usize> = 5..=10;

/// Traffic-light rating of an SEO field length, as shown to the lister.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRating {
    Good,
    Close,
    Off,
}

fn rate_length(len: usize, good: (usize, usize), close: (usize, usize)) -> LengthRating {
    if (good.0..=good.1).contains(&len) {
        LengthRating::Good
    } else if (close.0..=close.1).contains(&len) {
        LengthRating::Close
    } else {
        LengthRating::Off
    }
}

/// 55–65 characters is on target, 45–70 is close.
pub fn rate_meta_title(title: &str) -> LengthRating {
    rate_length(title.chars().count(), (55, 65), (45, 70))
}

/// 140–160 characters is on target, 120–170 is close.
pub fn rate_meta_description(description: &str) -> LengthRating {
    rate_length(description.chars().count(), (140, 160), (120, 170))
}

/// Whether the first sentence of a description frames the item as a
/// display piece rather than something to wear or use.
pub fn has_display_only_opening(description: &str) -> bool {
    let first = description
        .trim_start()
        .split_inclusive(['.', '!', '\n'])
        .next()
        .unwrap_or("")
        .to_lowercase();
    let display = first.contains("display") || first.contains("collectable");
    let not_for_use = first.contains("only")
        || first.contains("not intended")
        || first.contains("not for");
    display && not_for_use
}

pub fn build_copy_request(
    model: &str,
    record: &IdentificationRecord,
    meta: &ListingMetadata,
) -> serde_json::Result<ChatRequest> {
    Ok(ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(copy_system_prompt()),
            ChatMessage::user(copy_user_prompt(record, meta)?),
        ],
        max_tokens: COPY_MAX_TOKENS,
        temperature: COPY_TEMPERATURE,
    })
}

/// Log the soft targets the copy prompt asks for. None of them are enforced.
fn check_soft_targets(copy: &CatalogCopy, meta: &ListingMetadata) {
    if !TAG_RANGE.contains(&copy.tags.len()) {
        warn!(tags = copy.tags.len(), "Tag count outside 4-10");
    }
    if !META_KEYWORD_RANGE.contains(&copy.seo.meta_keywords.len()) {
        warn!(
            keywords = copy.seo.meta_keywords.len(),
            "Meta keyword count outside 5-10"
        );
    }
    let title = rate_meta_title(&copy.seo.meta_title);
    let description = rate_meta_description(&copy.seo.meta_description);
    if title != LengthRating::Good || description != LengthRating::Good {
        debug!(?title, ?description, "SEO lengths off target");
    }
    if meta.is_collectable && !has_display_only_opening(&copy.description) {
        warn!("Collectable description does not open with display-only framing");
    }
}

/// Write the listing copy for an identified item.
///
/// Navigation fields in the result always agree with each other; see
/// [`repair_navigation`].
#[instrument(level = "debug", skip(client, record, meta), fields(collectable = meta.is_collectable))]
pub async fn generate_copy<C>(
    client: &C,
    model: &str,
    record: &IdentificationRecord,
    meta: &ListingMetadata,
) -> Result<CatalogCopy, PipelineError>
where
    C: CompletionClient + ?Sized,
{
    let request = build_copy_request(model, record, meta).map_err(|e| {
        PipelineError::parse(
            Stage::Copy,
            ParseFailure {
                reason: format!("could not serialise vision analysis: {e}"),
                raw: String::new(),
            },
        )
    })?;
    let content = client
        .complete(&request)
        .await
        .map_err(|e| PipelineError::from_completion(Stage::Copy, e))?;
    debug!(content = %content, "copy response");

    let mut copy: CatalogCopy = parse_model_json(&content)
        .map_err(|failure| PipelineError::parse(Stage::Copy, failure))?;
    repair_navigation(&mut copy);
    check_soft_targets(&copy, meta);
    Ok(copy)
}
