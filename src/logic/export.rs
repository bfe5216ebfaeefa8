// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Export pipeline stages: request building, rasterization, and naming.
//!
//! The pipeline runs Validating → Rasterizing → Dispatching and ends in
//! Succeeded or Failed before returning to Idle. Validation lives in
//! [`crate::models::form::validate`]; dispatch lives in [`crate::logic::dispatch`].

use thiserror::Error;

use crate::config::CampaignConfig;
use crate::logic::card::render_card;
use crate::logic::raster::{RasterOptions, RasterizeError, Rasterizer};
use crate::models::form::{FormState, title_case, upper_case};
use crate::utils::sanitize_stem;

/// Which button started the export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportAction {
    /// Native share, falling back to a download.
    Share,
    /// Download straight away.
    Download,
}

/// Export pipeline state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportPhase {
    #[default]
    Idle,
    Validating,
    Rasterizing,
    Dispatching,
    Succeeded,
    Failed,
}

impl ExportPhase {
    pub fn is_idle(self) -> bool {
        self == ExportPhase::Idle
    }

    /// Label shown while the pipeline is busy.
    pub fn busy_label(self) -> Option<&'static str> {
        match self {
            ExportPhase::Validating => Some("Checking details…"),
            ExportPhase::Rasterizing => Some("Generating…"),
            ExportPhase::Dispatching => Some("Sending…"),
            _ => None,
        }
    }
}

/// Title and caption handed to the share capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

/// Rendered PNG ready for dispatch. Dropped once dispatch settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Everything the rasterization stage needs, captured from a validated form.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    pub action: ExportAction,
    pub svg: String,
    pub file_name: String,
    pub payload: SharePayload,
    pub scale: f32,
}

impl ExportRequest {
    /// Snapshot the current form. Callers validate first.
    pub fn capture(action: ExportAction, state: &FormState, config: &CampaignConfig) -> Self {
        Self {
            action,
            svg: render_card(state, &config.card).svg,
            file_name: export_file_name(&config.file_prefix, &state.name),
            payload: share_payload(state, config),
            scale: config.export_scale,
        }
    }
}

/// Errors that end an export in the Failed state.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not generate the image: {0}")]
    Rasterize(#[from] RasterizeError),
    #[error("Could not save the image: {0}")]
    Download(String),
}

/// `<prefix>-<slug>.png`, where the slug is the lower-cased name with whitespace runs as hyphens.
pub fn export_file_name(prefix: &str, name: &str) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("{}.png", sanitize_stem(&format!("{prefix}-{slug}")))
}

/// Fill the caption template with the normalized name and regions.
pub fn share_payload(state: &FormState, config: &CampaignConfig) -> SharePayload {
    let text = config
        .caption_template
        .replace("{name}", &title_case(state.name.trim()))
        .replace("{region_primary}", &upper_case(state.region_primary.trim()))
        .replace("{region_secondary}", &upper_case(state.region_secondary.trim()));
    SharePayload {
        title: config.share_title.clone(),
        text,
    }
}

/// Rasterization stage: render the captured card at export scale and encode it.
pub fn rasterize_artifact(
    rasterizer: &dyn Rasterizer,
    request: &ExportRequest,
) -> Result<ExportArtifact, ExportError> {
    let image = rasterizer.rasterize(
        &request.svg,
        RasterOptions {
            scale: request.scale,
        },
    )?;
    let png = image.to_png()?;
    Ok(ExportArtifact {
        file_name: request.file_name.clone(),
        width: image.width,
        height: image.height,
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::raster::{RasterImage, SvgRasterizer};

    struct Broken;

    impl Rasterizer for Broken {
        fn rasterize(&self, _: &str, _: RasterOptions) -> Result<RasterImage, RasterizeError> {
            Err(RasterizeError::Parse("boom".into()))
        }
    }

    fn state() -> FormState {
        FormState {
            name: "ahmed sani".into(),
            region_primary: "kano municipal".into(),
            region_secondary: "kano".into(),
            photo: None,
        }
    }

    #[test]
    fn file_name_uses_slug() {
        assert_eq!(export_file_name("nhf-tag", "Ahmed Sani"), "nhf-tag-ahmed-sani.png");
        assert_eq!(
            export_file_name("nhf-tag", "  Dr.   Ahmed \t Sani "),
            "nhf-tag-dr.-ahmed-sani.png"
        );
    }

    #[test]
    fn file_name_is_filesystem_safe() {
        assert_eq!(export_file_name("nhf-tag", "a/b"), "nhf-tag-a_b.png");
    }

    #[test]
    fn caption_uses_normalized_fields() {
        let payload = share_payload(&state(), &CampaignConfig::default());
        assert_eq!(payload.title, "NHF Cohort II Selection Announcement");
        assert!(payload.text.ends_with("- Ahmed Sani from KANO MUNICIPAL, KANO"));
    }

    #[test]
    fn capture_snapshots_form() {
        let config = CampaignConfig::default();
        let request = ExportRequest::capture(ExportAction::Share, &state(), &config);
        assert_eq!(request.file_name, "nhf-tag-ahmed-sani.png");
        assert_eq!(request.scale, 3.0);
        assert!(request.svg.contains("Ahmed Sani"));
    }

    #[test]
    fn rasterize_artifact_produces_png_at_scale() {
        let config = CampaignConfig::default();
        let request = ExportRequest::capture(ExportAction::Download, &state(), &config);
        let artifact = rasterize_artifact(&SvgRasterizer::without_fonts(), &request).unwrap();
        assert_eq!((artifact.width, artifact.height), (1080, 1920));
        assert_eq!(&artifact.png[..4], b"\x89PNG");
        assert_eq!(artifact.file_name, "nhf-tag-ahmed-sani.png");
    }

    #[test]
    fn rasterizer_failure_becomes_export_error() {
        let request =
            ExportRequest::capture(ExportAction::Share, &state(), &CampaignConfig::default());
        let err = rasterize_artifact(&Broken, &request).unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(_)));
    }

    #[test]
    fn busy_labels_only_for_active_stages() {
        assert_eq!(ExportPhase::Idle.busy_label(), None);
        assert!(ExportPhase::Rasterizing.busy_label().is_some());
        assert!(ExportPhase::Idle.is_idle());
        assert!(!ExportPhase::Dispatching.is_idle());
    }
}
