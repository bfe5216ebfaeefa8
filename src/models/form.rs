// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form values, case normalization, and required-field validation (UI-agnostic).

use std::collections::BTreeMap;

use crate::config::RegionLabels;
use crate::models::photo::Photo;

/// Every field the card needs before it can be exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Photo,
    Name,
    RegionPrimary,
    RegionSecondary,
}

/// Fields edited as free text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    RegionPrimary,
    RegionSecondary,
}

impl From<TextField> for Field {
    fn from(field: TextField) -> Self {
        match field {
            TextField::Name => Field::Name,
            TextField::RegionPrimary => Field::RegionPrimary,
            TextField::RegionSecondary => Field::RegionSecondary,
        }
    }
}

impl TextField {
    /// Apply the case transform this field uses once editing finishes.
    pub fn normalize(self, raw: &str) -> String {
        match self {
            TextField::Name => title_case(raw),
            TextField::RegionPrimary | TextField::RegionSecondary => upper_case(raw),
        }
    }
}

/// Current field values as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub region_primary: String,
    pub region_secondary: String,
    pub photo: Option<Photo>,
}

impl FormState {
    /// Raw value of a text field.
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::RegionPrimary => &self.region_primary,
            TextField::RegionSecondary => &self.region_secondary,
        }
    }

    /// Store raw input without normalizing it.
    pub fn set_text(&mut self, field: TextField, value: String) {
        match field {
            TextField::Name => self.name = value,
            TextField::RegionPrimary => self.region_primary = value,
            TextField::RegionSecondary => self.region_secondary = value,
        }
    }

    /// Overwrite a text field with its normalized form.
    pub fn normalize(&mut self, field: TextField) {
        let normalized = field.normalize(self.text(field));
        self.set_text(field, normalized);
    }

    /// Whether a required field holds a usable value.
    pub fn is_filled(&self, field: Field) -> bool {
        match field {
            Field::Photo => self.photo.is_some(),
            Field::Name => !self.name.trim().is_empty(),
            Field::RegionPrimary => !self.region_primary.trim().is_empty(),
            Field::RegionSecondary => !self.region_secondary.trim().is_empty(),
        }
    }

    /// Normalized name, or `None` while the field is blank.
    pub fn display_name(&self) -> Option<String> {
        let name = title_case(self.name.trim());
        (!name.is_empty()).then_some(name)
    }

    /// Regions joined as printed on the card, e.g. `KANO MUNICIPAL, KANO`.
    pub fn location_label(&self) -> Option<String> {
        let primary = upper_case(self.region_primary.trim());
        let secondary = upper_case(self.region_secondary.trim());
        match (primary.is_empty(), secondary.is_empty()) {
            (true, true) => None,
            (false, true) => Some(primary),
            (true, false) => Some(secondary),
            (false, false) => Some(format!("{primary}, {secondary}")),
        }
    }
}

/// Field-to-message mapping produced by [`validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a field, when it failed validation.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Drop the error recorded for a single field.
    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    fn insert(&mut self, field: Field, message: String) {
        self.errors.insert(field, message);
    }
}

/// Report every required field that is missing or blank after trimming.
///
/// The result is empty exactly when the form can be exported.
pub fn validate(state: &FormState, labels: &RegionLabels) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let checks = [
        (Field::Photo, "Photo".to_string()),
        (Field::Name, "Name".to_string()),
        (Field::RegionPrimary, labels.region_primary.clone()),
        (Field::RegionSecondary, labels.region_secondary.clone()),
    ];
    for (field, label) in checks {
        if !state.is_filled(field) {
            errors.insert(field, format!("{label} is required"));
        }
    }
    errors
}

/// Upper-case the first character of every word, leaving the rest untouched.
///
/// A word starts at an alphanumeric or `_` character that does not follow another one,
/// so `o'neil` becomes `O'Neil` and `mary-jane` becomes `Mary-Jane`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        let word_char = ch.is_alphanumeric() || ch == '_';
        if word_char && !in_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        in_word = word_char;
    }
    out
}

/// Upper-case every character.
pub fn upper_case(value: &str) -> String {
    value.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::photo::Photo;

    fn sample_photo() -> Photo {
        Photo::new("me.png".into(), "image/png".into(), 2, 2, &[1, 2, 3])
    }

    fn filled() -> FormState {
        FormState {
            name: "Ahmed Sani".into(),
            region_primary: "KANO MUNICIPAL".into(),
            region_secondary: "KANO".into(),
            photo: Some(sample_photo()),
        }
    }

    #[test]
    fn complete_form_has_no_errors() {
        assert!(validate(&filled(), &RegionLabels::default()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate(&FormState::default(), &RegionLabels::default());
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(Field::Photo), Some("Photo is required"));
        assert_eq!(errors.get(Field::Name), Some("Name is required"));
        assert_eq!(errors.get(Field::RegionPrimary), Some("LGA is required"));
        assert_eq!(errors.get(Field::RegionSecondary), Some("State is required"));
    }

    #[test]
    fn whitespace_only_fields_count_as_empty() {
        for field in [TextField::Name, TextField::RegionPrimary, TextField::RegionSecondary] {
            let mut state = filled();
            state.set_text(field, " \t  ".into());
            let errors = validate(&state, &RegionLabels::default());
            assert_eq!(errors.len(), 1, "{field:?}");
            assert!(errors.get(field.into()).is_some());
        }
    }

    #[test]
    fn missing_photo_alone_fails() {
        let mut state = filled();
        state.photo = None;
        let errors = validate(&state, &RegionLabels::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Photo), Some("Photo is required"));
    }

    #[test]
    fn labels_flow_into_messages() {
        let labels = RegionLabels {
            region_primary: "District".into(),
            region_secondary: "Province".into(),
        };
        let errors = validate(&FormState::default(), &labels);
        assert_eq!(errors.get(Field::RegionPrimary), Some("District is required"));
        assert_eq!(errors.get(Field::RegionSecondary), Some("Province is required"));
    }

    #[test]
    fn normalizes_sample_entry() {
        let mut state = FormState {
            name: "ahmed sani".into(),
            region_primary: "kano municipal".into(),
            region_secondary: "kano".into(),
            photo: None,
        };
        state.normalize(TextField::Name);
        state.normalize(TextField::RegionPrimary);
        state.normalize(TextField::RegionSecondary);

        assert_eq!(state.name, "Ahmed Sani");
        assert_eq!(state.region_primary, "KANO MUNICIPAL");
        assert_eq!(state.region_secondary, "KANO");
        assert_eq!(state.location_label().as_deref(), Some("KANO MUNICIPAL, KANO"));
    }

    #[test]
    fn title_case_is_idempotent() {
        for input in ["ahmed sani", "Dr. ahmed", "mary-jane o'neil", "émile zola", "x_y z9"] {
            let once = title_case(input);
            assert_eq!(title_case(&once), once, "{input}");
        }
    }

    #[test]
    fn title_case_keeps_inner_letters() {
        assert_eq!(title_case("mary-jane o'neil"), "Mary-Jane O'Neil");
        assert_eq!(title_case("mcDONALD"), "McDONALD");
        assert_eq!(title_case("  two   spaces "), "  Two   Spaces ");
    }

    #[test]
    fn upper_case_is_idempotent() {
        let once = upper_case("kano municipal");
        assert_eq!(once, "KANO MUNICIPAL");
        assert_eq!(upper_case(&once), once);
    }

    #[test]
    fn location_label_handles_partial_regions() {
        let mut state = FormState::default();
        assert_eq!(state.location_label(), None);

        state.region_primary = "ikeja".into();
        assert_eq!(state.location_label().as_deref(), Some("IKEJA"));

        state.region_primary.clear();
        state.region_secondary = " lagos ".into();
        assert_eq!(state.location_label().as_deref(), Some("LAGOS"));
    }

    #[test]
    fn display_name_is_normalized_or_absent() {
        let mut state = FormState::default();
        assert_eq!(state.display_name(), None);
        state.name = "  ahmed sani ".into();
        assert_eq!(state.display_name().as_deref(), Some("Ahmed Sani"));
    }
}
