// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Live card preview, rasterized on the worker pool through the same path as exports.

use eframe::egui;

use crate::logic::card::{CARD_HEIGHT, CARD_WIDTH};

/// Form revision and output scale a preview image was rendered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewKey {
    pub revision: u64,
    scale_bits: u32,
}

impl PreviewKey {
    pub fn new(revision: u64, scale: f32) -> Self {
        Self {
            revision,
            scale_bits: scale.to_bits(),
        }
    }

    pub fn scale(self) -> f32 {
        f32::from_bits(self.scale_bits)
    }
}

/// Preview state: at most one render in flight, latest texture kept on screen meanwhile.
#[derive(Default)]
pub struct PreviewModel {
    requested: Option<PreviewKey>,
    in_flight: bool,
    decoded: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
    error: Option<String>,
}

/// Messages emitted by the preview view and the render worker.
pub enum PreviewMsg {
    /// The view needs an image for this key.
    Wanted(PreviewKey),
    Rendered {
        key: PreviewKey,
        result: Result<egui::ColorImage, String>,
    },
}

/// Side effects requested by the preview.
pub enum PreviewCommand {
    Render(PreviewKey),
}

impl PreviewModel {
    /// Whether a render is currently running.
    pub fn is_rendering(&self) -> bool {
        self.in_flight
    }

    /// Hand over a freshly decoded image so the shell can upload it as a texture.
    pub fn take_decoded(&mut self) -> Option<egui::ColorImage> {
        self.decoded.take()
    }

    pub fn set_texture(&mut self, texture: egui::TextureHandle) {
        self.texture = Some(texture);
    }
}

/// Apply a preview message. `revision` is the current form revision.
pub fn update(model: &mut PreviewModel, msg: PreviewMsg, revision: u64) -> Option<PreviewCommand> {
    match msg {
        PreviewMsg::Wanted(key) => {
            if model.in_flight || model.requested == Some(key) || key.revision != revision {
                return None;
            }
            model.requested = Some(key);
            model.in_flight = true;
            Some(PreviewCommand::Render(key))
        }
        PreviewMsg::Rendered { key, result } => {
            model.in_flight = false;
            if key.revision != revision {
                log::debug!("Dropping preview for revision {} (now {revision})", key.revision);
                // Let the view ask again for the current revision.
                model.requested = None;
                return None;
            }
            match result {
                Ok(image) => {
                    model.decoded = Some(image);
                    model.error = None;
                }
                Err(err) => {
                    log::error!("Preview rendering failed: {err}");
                    model.error = Some(err);
                }
            }
            None
        }
    }
}

/// Draw the card at `width` points and request a new render when the form or scale changed.
pub fn view(ui: &mut egui::Ui, model: &PreviewModel, revision: u64, width: f32) -> Vec<PreviewMsg> {
    let mut msgs = Vec::new();
    let scale = width / CARD_WIDTH * ui.ctx().pixels_per_point();
    let key = PreviewKey::new(revision, scale);
    if model.requested != Some(key) && !model.in_flight {
        msgs.push(PreviewMsg::Wanted(key));
    }

    let size = egui::vec2(width, width * CARD_HEIGHT / CARD_WIDTH);
    match (&model.texture, &model.error) {
        (_, Some(err)) => {
            ui.allocate_ui(size, |ui| {
                ui.label(format!("Preview unavailable: {err}"));
            });
        }
        (Some(texture), None) => {
            ui.add(egui::Image::new((texture.id(), size)));
        }
        (None, None) => {
            ui.allocate_ui(size, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Spinner::new().size(24.0));
                });
            });
        }
    }

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 255])
    }

    #[test]
    fn one_render_at_a_time() {
        let mut model = PreviewModel::default();
        let first = PreviewKey::new(1, 1.0);

        assert!(matches!(
            update(&mut model, PreviewMsg::Wanted(first), 1),
            Some(PreviewCommand::Render(k)) if k == first
        ));
        assert!(model.is_rendering());
        assert!(update(&mut model, PreviewMsg::Wanted(PreviewKey::new(1, 2.0)), 1).is_none());
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut model = PreviewModel::default();
        let key = PreviewKey::new(1, 1.0);
        update(&mut model, PreviewMsg::Wanted(key), 1);

        let cmd = update(
            &mut model,
            PreviewMsg::Rendered {
                key,
                result: Ok(image()),
            },
            2,
        );

        assert!(cmd.is_none());
        assert!(!model.is_rendering());
        assert!(model.take_decoded().is_none());
        assert!(update(&mut model, PreviewMsg::Wanted(PreviewKey::new(2, 1.0)), 2).is_some());
    }

    #[test]
    fn fresh_result_is_handed_to_the_shell() {
        let mut model = PreviewModel::default();
        let key = PreviewKey::new(3, 1.5);
        update(&mut model, PreviewMsg::Wanted(key), 3);
        update(
            &mut model,
            PreviewMsg::Rendered {
                key,
                result: Ok(image()),
            },
            3,
        );

        assert!(model.take_decoded().is_some());
        assert!(model.take_decoded().is_none());
        // Same key is not rendered twice.
        assert!(update(&mut model, PreviewMsg::Wanted(key), 3).is_none());
        assert_eq!(key.scale(), 1.5);
    }

    #[test]
    fn failures_are_kept_for_display() {
        let mut model = PreviewModel::default();
        let key = PreviewKey::new(1, 1.0);
        update(&mut model, PreviewMsg::Wanted(key), 1);
        update(
            &mut model,
            PreviewMsg::Rendered {
                key,
                result: Err("bad markup".into()),
            },
            1,
        );

        assert_eq!(model.error.as_deref(), Some("bad markup"));
        assert!(!model.is_rendering());
    }
}
