// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Photo upload area.

use eframe::egui;

use crate::models::photo::Photo;
use crate::ui::components::form::ERROR_COLOR;
use crate::utils::format_bytes;

/// Messages emitted by the upload area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoMsg {
    RequestPick,
    Remove,
}

/// Render the upload area: a call to action when empty, file details otherwise.
pub fn view(
    ui: &mut egui::Ui,
    photo: Option<&Photo>,
    error: Option<&str>,
    max_bytes: u64,
    enabled: bool,
) -> Vec<PhotoMsg> {
    let mut msgs = Vec::new();

    ui.label(egui::RichText::new("Profile Photo").strong());
    ui.add_space(4.0);

    let visuals = ui.visuals().clone();
    let stroke = if error.is_some() {
        egui::Stroke::new(2.0, ERROR_COLOR)
    } else {
        visuals.widgets.noninteractive.bg_stroke
    };

    egui::Frame::new()
        .fill(visuals.extreme_bg_color)
        .stroke(stroke)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            match photo {
                None => {
                    ui.vertical_centered(|ui| {
                        let button = egui::Button::new(
                            egui::RichText::new(format!(
                                "{}  Click to upload photo",
                                egui_phosphor::regular::CAMERA
                            ))
                            .size(16.0),
                        );
                        if ui.add_enabled(enabled, button).clicked() {
                            msgs.push(PhotoMsg::RequestPick);
                        }
                        ui.label(
                            egui::RichText::new(format!(
                                "PNG, JPG up to {}",
                                format_bytes(max_bytes)
                            ))
                            .small()
                            .color(egui::Color32::from_gray(139)),
                        );
                    });
                }
                Some(photo) => {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(egui_phosphor::regular::IMAGE)
                                .size(28.0)
                                .color(egui::Color32::from_rgb(42, 82, 152)),
                        );
                        ui.vertical(|ui| {
                            ui.label(photo.file_name.as_str());
                            ui.label(
                                egui::RichText::new(format!(
                                    "{} | {}×{}",
                                    photo.mime, photo.width, photo.height
                                ))
                                .small()
                                .color(egui::Color32::from_gray(102)),
                            );
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .add_enabled(
                                    enabled,
                                    egui::Button::new(egui_phosphor::regular::TRASH_SIMPLE),
                                )
                                .on_hover_text("Remove photo")
                                .clicked()
                            {
                                msgs.push(PhotoMsg::Remove);
                            }
                            if ui
                                .add_enabled(enabled, egui::Button::new("Change"))
                                .clicked()
                            {
                                msgs.push(PhotoMsg::RequestPick);
                            }
                        });
                    });
                }
            }
        });

    if let Some(err) = error {
        ui.label(egui::RichText::new(err).small().color(ERROR_COLOR));
    }

    msgs
}
