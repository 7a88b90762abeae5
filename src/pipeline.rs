//! Request orchestration: validate, identify, then write copy.

use std::sync::Arc;

use base64::Engine as _;
use tracing::{error, info, instrument, warn};

use crate::ai::completion::{CompletionClient, OpenAiClient};
use crate::ai::config::{AiConfig, DEFAULT_COPY_MODEL, DEFAULT_VISION_MODEL};
use crate::ai::copy::generate_copy;
use crate::ai::vision::analyze_images;
use crate::error::PipelineError;
use crate::taxonomy::is_known_category;
use crate::types::{ListingResult, RequestInput};

pub const MISSING_FIELDS_MESSAGE: &str = "Title and at least one image are required.";
pub const MISSING_KEY_MESSAGE: &str = "OPENAI_API_KEY is not configured";

/// Upload limit of the staff form.
pub const MAX_IMAGES: usize = 5;

/// Model selection for the two calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub vision_model: String,
    pub copy_model: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            copy_model: DEFAULT_COPY_MODEL.to_string(),
        }
    }
}

impl From<&AiConfig> for PipelineSettings {
    fn from(config: &AiConfig) -> Self {
        Self {
            vision_model: config.vision_model.clone(),
            copy_model: config.copy_model.clone(),
        }
    }
}

/// Check that `image` is a `data:image/...;base64,` URI with a decodable
/// payload. The string is checked exactly as it will be sent to the model.
fn validate_image(index: usize, image: &str) -> Result<(), PipelineError> {
    let invalid = || {
        PipelineError::Validation(format!(
            "Image {} is not a base64 image data URI.",
            index + 1
        ))
    };
    let rest = image.strip_prefix("data:").ok_or_else(invalid)?;
    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
    let mime = header.strip_suffix(";base64").ok_or_else(invalid)?;
    if !mime.starts_with("image/") || payload.is_empty() {
        return Err(invalid());
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| invalid())?;
    Ok(())
}

/// Reject requests that must not reach the model.
pub fn validate_input(input: &RequestInput) -> Result<(), PipelineError> {
    if input.title.trim().is_empty() || input.images.is_empty() {
        return Err(PipelineError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }
    if input.images.len() > MAX_IMAGES {
        return Err(PipelineError::Validation(format!(
            "At most {MAX_IMAGES} images are allowed."
        )));
    }
    for (index, image) in input.images.iter().enumerate() {
        validate_image(index, image)?;
    }
    if let Some(category) = input.category.as_deref().filter(|c| !c.trim().is_empty()) {
        if !is_known_category(category) {
            warn!(category, "Category is not one of the form options");
        }
    }
    Ok(())
}

/// Run both stages for one request.
///
/// The copy stage only runs once the vision stage has produced a record.
/// Any failure ends the request; nothing is retried.
#[instrument(level = "debug", skip_all, fields(title = %input.title, images = input.images.len()))]
pub async fn generate_listing<C>(
    client: &C,
    settings: &PipelineSettings,
    input: &RequestInput,
) -> Result<ListingResult, PipelineError>
where
    C: CompletionClient + ?Sized,
{
    validate_input(input)?;

    let vision_analysis = analyze_images(client, &settings.vision_model, input).await?;
    info!(
        guessed_name = %vision_analysis.guessed_name,
        confidence = vision_analysis.confidence,
        band = ?vision_analysis.confidence_band(),
        "Vision analysis complete"
    );

    let generated_content =
        generate_copy(client, &settings.copy_model, &vision_analysis, &input.metadata()).await?;
    info!(
        suggested_title = %generated_content.suggested_title,
        nav_path = %generated_content.nav_path,
        "Product copy generated"
    );

    Ok(ListingResult {
        vision_analysis,
        generated_content,
    })
}

/// Entry point used by the HTTP layer. Holds the completion client when a
/// credential is configured.
#[derive(Clone)]
pub struct Orchestrator {
    client: Option<Arc<dyn CompletionClient>>,
    settings: PipelineSettings,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, settings: PipelineSettings) -> Self {
        Self {
            client: Some(client),
            settings,
        }
    }

    /// An orchestrator that fails every request with a configuration error.
    pub fn unconfigured() -> Self {
        Self {
            client: None,
            settings: PipelineSettings::default(),
        }
    }

    pub fn from_config(ai: Option<&AiConfig>) -> anyhow::Result<Self> {
        match ai {
            Some(config) => Ok(Self::new(
                Arc::new(OpenAiClient::new(config)?),
                PipelineSettings::from(config),
            )),
            None => {
                warn!("OPENAI_API_KEY not set; generation requests will fail");
                Ok(Self::unconfigured())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Run the pipeline, logging any failure before handing it back.
    pub async fn run(&self, input: &RequestInput) -> Result<ListingResult, PipelineError> {
        let result = match &self.client {
            Some(client) => generate_listing(&**client, &self.settings, input).await,
            None => Err(PipelineError::Configuration(MISSING_KEY_MESSAGE.to_string())),
        };
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }
}

fn log_failure(err: &PipelineError) {
    match err {
        PipelineError::Validation(message) => {
            warn!(kind = err.kind(), %message, "Rejected listing request");
        }
        PipelineError::Upstream {
            stage,
            status,
            body,
        } => {
            error!(kind = err.kind(), %stage, status, body = %body, "Listing generation failed");
        }
        PipelineError::Parse { stage, failure } => {
            error!(
                kind = err.kind(),
                %stage,
                reason = %failure.reason,
                raw = %failure.raw,
                "Listing generation failed"
            );
        }
        _ => error!(kind = err.kind(), error = %err, "Listing generation failed"),
    }
}
