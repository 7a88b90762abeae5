//! Data contracts exchanged between the two AI stages and the HTTP caller.
//!
//! Both model payloads are parsed strictly: every field is required and
//! unknown fields are rejected, so a model that drifts from the requested
//! schema produces a parse error instead of a silently defaulted record.

use serde::{Deserialize, Serialize};

/// Structured identification guess produced by the vision stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdentificationRecord {
    pub guessed_name: String,
    pub branch_or_nation: String,
    pub era_or_decade: String,
    pub item_type: String,
    pub camouflage_pattern: String,
    pub likely_use_cases: Vec<String>,
    pub condition_guess: String,
    pub is_collectable_likely: bool,
    pub is_likely_replica: bool,
    /// Model-reported, not clamped. Use [`IdentificationRecord::confidence_band`]
    /// when displaying it.
    pub confidence: f64,
    pub historical_notes: String,
    pub other_details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl IdentificationRecord {
    /// Bucket the confidence for display, treating NaN and out-of-range
    /// values as the nearest bound.
    pub fn confidence_band(&self) -> ConfidenceBand {
        let c = if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        };
        if c >= 0.8 {
            ConfidenceBand::High
        } else if c >= 0.5 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeoMetadata {
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: Vec<String>,
}

/// Customer-facing listing copy produced by the copy stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogCopy {
    pub suggested_title: String,
    pub description: String,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub notes_for_lister: String,
    pub nav_primary: String,
    pub nav_secondary: String,
    pub nav_tertiary: String,
    pub nav_path: String,
    pub seo: SeoMetadata,
}

/// Staff-supplied form data. Missing fields deserialize to empty values so
/// the orchestrator can report them with its own validation message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestInput {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub category: Option<String>,
    pub is_collectable: bool,
    pub staff_notes: Option<String>,
    /// Inline `data:image/...;base64,` URIs, primary shot first.
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The image-free part of a request, handed to the copy stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingMetadata {
    pub title: String,
    pub category: Option<String>,
    pub is_collectable: bool,
    pub staff_notes: Option<String>,
}

impl RequestInput {
    pub fn metadata(&self) -> ListingMetadata {
        ListingMetadata {
            title: self.title.clone(),
            category: self.category.clone(),
            is_collectable: self.is_collectable,
            staff_notes: self.staff_notes.clone(),
        }
    }
}

/// Combined result returned to the caller on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    pub vision_analysis: IdentificationRecord,
    pub generated_content: CatalogCopy,
}

/// Treat `None`, empty and whitespace-only strings the same way.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
