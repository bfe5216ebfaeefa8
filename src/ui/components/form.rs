// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form fields component: raw edits, normalize-on-blur, and per-field errors.

use eframe::egui;

use crate::config::RegionLabels;
use crate::models::form::{Field, FormState, TextField, ValidationErrors};
use crate::models::photo::Photo;
use crate::utils::viewport::LayoutMode;

/// Error text color shared by form widgets.
pub const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);

/// Field values plus the errors from the latest export attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormModel {
    state: FormState,
    errors: ValidationErrors,
}

/// Messages emitted by the form view and the photo picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMsg {
    Edited(TextField, String),
    Blurred(TextField),
    PhotoAccepted(Photo),
    PhotoRemoved,
}

impl FormModel {
    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Replace all errors wholesale with a fresh validation result.
    pub fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }
}

/// Apply a message. Returns `true` when the card would render differently.
pub fn update(model: &mut FormModel, msg: FormMsg) -> bool {
    match msg {
        FormMsg::Edited(field, value) => {
            if model.state.text(field) == value {
                return false;
            }
            model.state.set_text(field, value);
            if model.state.is_filled(field.into()) {
                model.errors.clear(field.into());
            }
            true
        }
        FormMsg::Blurred(field) => {
            let before = model.state.text(field).to_string();
            model.state.normalize(field);
            model.state.text(field) != before
        }
        FormMsg::PhotoAccepted(photo) => {
            model.state.photo = Some(photo);
            model.errors.clear(Field::Photo);
            true
        }
        FormMsg::PhotoRemoved => model.state.photo.take().is_some(),
    }
}

/// Render the name and region inputs.
pub fn view(
    ui: &mut egui::Ui,
    model: &FormModel,
    labels: &RegionLabels,
    layout: LayoutMode,
    enabled: bool,
) -> Vec<FormMsg> {
    let mut msgs = Vec::new();

    text_input(
        ui,
        model,
        TextField::Name,
        "Full Name (Auto-capitalized)",
        "e.g., Dr. Ahmed Sani",
        enabled,
        &mut msgs,
    );
    ui.add_space(12.0);

    let primary = format!("{} (Auto-capitalized)", labels.region_primary);
    let secondary = format!("{} (Auto-capitalized)", labels.region_secondary);
    match layout {
        LayoutMode::Wide => {
            ui.columns(2, |cols| {
                text_input(
                    &mut cols[0],
                    model,
                    TextField::RegionPrimary,
                    &primary,
                    "e.g., KANO MUNICIPAL",
                    enabled,
                    &mut msgs,
                );
                text_input(
                    &mut cols[1],
                    model,
                    TextField::RegionSecondary,
                    &secondary,
                    "e.g., KANO",
                    enabled,
                    &mut msgs,
                );
            });
        }
        LayoutMode::Compact => {
            text_input(
                ui,
                model,
                TextField::RegionPrimary,
                &primary,
                "e.g., KANO MUNICIPAL",
                enabled,
                &mut msgs,
            );
            ui.add_space(12.0);
            text_input(
                ui,
                model,
                TextField::RegionSecondary,
                &secondary,
                "e.g., KANO",
                enabled,
                &mut msgs,
            );
        }
    }

    msgs
}

fn text_input(
    ui: &mut egui::Ui,
    model: &FormModel,
    field: TextField,
    label: &str,
    hint: &str,
    enabled: bool,
    msgs: &mut Vec<FormMsg>,
) {
    ui.label(egui::RichText::new(label).strong());
    ui.add_space(4.0);

    let mut value = model.state.text(field).to_string();
    let response = ui.add_enabled(
        enabled,
        egui::TextEdit::singleline(&mut value)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        msgs.push(FormMsg::Edited(field, value));
    }
    if response.lost_focus() {
        msgs.push(FormMsg::Blurred(field));
    }

    if let Some(err) = model.errors.get(field.into()) {
        ui.label(egui::RichText::new(err).small().color(ERROR_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::validate;

    #[test]
    fn edits_store_raw_text() {
        let mut model = FormModel::default();
        assert!(update(&mut model, FormMsg::Edited(TextField::Name, "ahmed sani".into())));
        assert_eq!(model.state().name, "ahmed sani");
    }

    #[test]
    fn blur_normalizes_each_field() {
        let mut model = FormModel::default();
        update(&mut model, FormMsg::Edited(TextField::Name, "ahmed sani".into()));
        update(&mut model, FormMsg::Edited(TextField::RegionPrimary, "kano municipal".into()));
        update(&mut model, FormMsg::Edited(TextField::RegionSecondary, "kano".into()));

        assert!(update(&mut model, FormMsg::Blurred(TextField::Name)));
        assert!(update(&mut model, FormMsg::Blurred(TextField::RegionPrimary)));
        assert!(update(&mut model, FormMsg::Blurred(TextField::RegionSecondary)));

        assert_eq!(model.state().name, "Ahmed Sani");
        assert_eq!(model.state().region_primary, "KANO MUNICIPAL");
        assert_eq!(model.state().region_secondary, "KANO");

        // A second blur is a no-op.
        assert!(!update(&mut model, FormMsg::Blurred(TextField::Name)));
    }

    #[test]
    fn correcting_a_field_clears_only_its_error() {
        let mut model = FormModel::default();
        model.set_errors(validate(model.state(), &RegionLabels::default()));
        assert_eq!(model.errors().len(), 4);

        update(&mut model, FormMsg::Edited(TextField::Name, "   ".into()));
        assert!(model.errors().get(Field::Name).is_some());

        update(&mut model, FormMsg::Edited(TextField::Name, "Ada".into()));
        assert!(model.errors().get(Field::Name).is_none());
        assert_eq!(model.errors().len(), 3);
    }

    #[test]
    fn photo_acceptance_clears_photo_error() {
        let mut model = FormModel::default();
        model.set_errors(validate(model.state(), &RegionLabels::default()));
        let photo = Photo::new("a.png".into(), "image/png".into(), 1, 1, &[1]);

        assert!(update(&mut model, FormMsg::PhotoAccepted(photo)));
        assert!(model.errors().get(Field::Photo).is_none());
        assert!(update(&mut model, FormMsg::PhotoRemoved));
        assert!(!update(&mut model, FormMsg::PhotoRemoved));
    }
}
