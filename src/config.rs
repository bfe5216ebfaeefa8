// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Campaign configuration: card copy, share caption, and export limits.
//!
//! Defaults are compiled in. The bundled `assets/campaign.json` overrides them
//! at startup; a malformed bundle falls back to the defaults with a warning.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Campaign definition bundled with the binary.
const BUNDLED_CAMPAIGN: &str = include_str!("../assets/campaign.json");

/// Upload ceiling used when the campaign does not set one (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Upscale factor applied when rasterizing the card for export.
pub const DEFAULT_EXPORT_SCALE: f32 = 3.0;

/// Seconds a confirmation notice stays visible.
pub const DEFAULT_NOTICE_SECONDS: u64 = 3;

/// Errors raised while loading a campaign definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid campaign definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("export scale must be a positive number, got {0}")]
    InvalidScale(f32),
    #[error("upload ceiling must be greater than zero")]
    InvalidUploadLimit,
}

/// Text printed on the card itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardCopy {
    /// Pill at the top of the card.
    pub badge: String,
    /// Headline lines below the badge.
    pub headline: Vec<String>,
    /// Announcement paragraph shown under the photo.
    pub announcement: String,
    /// Role line under the name.
    pub role: String,
    pub hashtags: String,
    /// Small footer line.
    pub credit: String,
    /// Shown in place of the name while the field is empty.
    pub name_placeholder: String,
}

impl Default for CardCopy {
    fn default() -> Self {
        Self {
            badge: "NHF COHORT II".into(),
            headline: vec!["National Health".into(), "Fellow".into()],
            announcement: "I'm thrilled and grateful to share that I've been selected as a National Health Fellow – Cohort II! 🙌💚".into(),
            role: "Strengthening Primary Healthcare".into(),
            hashtags: "#NHFCohortII #PrimaryHealthcare".into(),
            credit: "Developed by Shamsu Nafiu • NHF Cohort II".into(),
            name_placeholder: "Your Name".into(),
        }
    }
}

/// User-facing names of the two region fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionLabels {
    pub region_primary: String,
    pub region_secondary: String,
}

impl Default for RegionLabels {
    fn default() -> Self {
        Self {
            region_primary: "LGA".into(),
            region_secondary: "State".into(),
        }
    }
}

/// Everything the form, renderer, and export pipeline need to know about the campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Prefix of exported file names (`<prefix>-<slug>.png`).
    pub file_prefix: String,
    /// Title handed to the native share capability.
    pub share_title: String,
    /// Share caption with `{name}`, `{region_primary}`, `{region_secondary}` placeholders.
    pub caption_template: String,
    pub card: CardCopy,
    pub labels: RegionLabels,
    /// Largest accepted photo upload in bytes (inclusive).
    pub max_upload_bytes: u64,
    /// Rasterization upscale factor for exports.
    pub export_scale: f32,
    /// How long the success notice stays on screen.
    pub notice_seconds: u64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            file_prefix: "nhf-tag".into(),
            share_title: "NHF Cohort II Selection Announcement".into(),
            caption_template: "I'm thrilled and grateful to share that I've been selected as a National Health Fellow – Cohort II! 🙌💚\n\nJoin me in strengthening Primary Healthcare! - {name} from {region_primary}, {region_secondary}".into(),
            card: CardCopy::default(),
            labels: RegionLabels::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            export_scale: DEFAULT_EXPORT_SCALE,
            notice_seconds: DEFAULT_NOTICE_SECONDS,
        }
    }
}

impl CampaignConfig {
    /// Parse and validate a campaign definition from JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the bundled campaign, falling back to compiled-in defaults.
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_CAMPAIGN) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Bundled campaign rejected, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Duration of the transient success notice.
    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.export_scale.is_finite() || self.export_scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.export_scale));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidUploadLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_campaign_parses() {
        let config = CampaignConfig::from_json(BUNDLED_CAMPAIGN).expect("bundled json is valid");
        assert_eq!(config.file_prefix, "nhf-tag");
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.export_scale, 3.0);
        assert_eq!(config.notice_duration(), Duration::from_secs(3));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = CampaignConfig::from_json(r#"{"file_prefix": "demo"}"#).unwrap();
        assert_eq!(config.file_prefix, "demo");
        assert_eq!(config.labels, RegionLabels::default());
        assert_eq!(config.card.name_placeholder, "Your Name");
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = CampaignConfig::from_json(r#"{"export_scale": 0.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScale(_)));
    }

    #[test]
    fn rejects_zero_upload_limit() {
        let err = CampaignConfig::from_json(r#"{"max_upload_bytes": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUploadLimit));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            CampaignConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
