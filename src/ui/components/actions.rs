// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Share / download buttons and the validation summary.

use eframe::egui;

use crate::logic::export::{ExportAction, ExportPhase};
use crate::ui::components::form::ERROR_COLOR;
use crate::utils::viewport::LayoutMode;

const SHARE_GREEN: egui::Color32 = egui::Color32::from_rgb(37, 211, 102);
const BRAND_BLUE: egui::Color32 = egui::Color32::from_rgb(42, 82, 152);

/// Render the export buttons. They stay disabled until the pipeline is idle again.
pub fn view(
    ui: &mut egui::Ui,
    phase: ExportPhase,
    has_errors: bool,
    layout: LayoutMode,
) -> Vec<ExportAction> {
    let mut actions = Vec::new();
    let idle = phase.is_idle();

    let share_label = match phase.busy_label() {
        Some(busy) => busy.to_string(),
        None => format!("{} Share", egui_phosphor::regular::SHARE_NETWORK),
    };
    let download_label = match phase.busy_label() {
        Some(busy) => busy.to_string(),
        None => format!(
            "{} Download Image",
            egui_phosphor::regular::DOWNLOAD_SIMPLE
        ),
    };

    let mut buttons = |ui: &mut egui::Ui, width: f32| {
        let share = egui::Button::new(egui::RichText::new(share_label.as_str()).color(egui::Color32::WHITE))
            .fill(SHARE_GREEN)
            .min_size(egui::vec2(width, 40.0));
        if ui
            .add_enabled(idle, share)
            .on_hover_text("Share the card, or save it when sharing is unavailable")
            .clicked()
        {
            actions.push(ExportAction::Share);
        }

        let download = egui::Button::new(
            egui::RichText::new(download_label.as_str()).color(egui::Color32::WHITE),
        )
        .fill(BRAND_BLUE)
        .min_size(egui::vec2(width, 40.0));
        if ui.add_enabled(idle, download).clicked() {
            actions.push(ExportAction::Download);
        }
    };

    match layout {
        LayoutMode::Wide => {
            ui.horizontal(|ui| {
                let width = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
                buttons(ui, width);
            });
        }
        LayoutMode::Compact => {
            ui.vertical(|ui| {
                let width = ui.available_width();
                buttons(ui, width);
            });
        }
    }

    if !idle {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new().size(14.0));
            ui.label(egui::RichText::new(phase.busy_label().unwrap_or_default()).small());
        });
    }

    if has_errors {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{} Please fill in all required fields",
                    egui_phosphor::regular::WARNING
                ))
                .color(ERROR_COLOR),
            );
        });
    }

    actions
}
