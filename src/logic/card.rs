// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Tag card renderer.
//!
//! Turns the form state into a self-contained SVG document. The same document
//! backs the on-screen preview and the exported PNG, so nothing outside the
//! inputs may influence the output.

use std::fmt::Write;

use crate::config::CardCopy;
use crate::models::form::FormState;

/// Card width in SVG user units (9:16 portrait).
pub const CARD_WIDTH: f32 = 360.0;
/// Card height in SVG user units.
pub const CARD_HEIGHT: f32 = 640.0;

const FONT_STACK: &str = "Inter, 'Helvetica Neue', Arial, 'DejaVu Sans', sans-serif";
const NAVY: &str = "#1e3c72";
const INK: &str = "#1e293b";
const SLATE: &str = "#2d3a4a";
const PHOTO_RADIUS: f32 = 90.0;
const ANNOUNCEMENT_CHARS: usize = 38;
const NAME_CHARS: usize = 24;

/// A rendered card ready for preview or rasterization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSvg {
    pub svg: String,
}

/// Render the card for the current form state.
pub fn render_card(state: &FormState, copy: &CardCopy) -> CardSvg {
    let mut doc = SvgDoc::new();
    doc.defs();
    doc.background();

    let center = CARD_WIDTH / 2.0;
    let mut y = 24.0;

    // Badge pill.
    let badge_w = text_width(&copy.badge, 14.0) + 32.0;
    doc.pill(center, y, badge_w, 32.0, "url(#brand)", None);
    doc.text(center, y + 21.0, 14.0, 700, "#ffffff", &copy.badge);
    y += 32.0 + 34.0;

    for line in &copy.headline {
        doc.text(center, y, 24.0, 800, NAVY, line);
        y += 29.0;
    }

    // Photo, or a placeholder circle when none was uploaded yet.
    let photo_cy = y + PHOTO_RADIUS;
    match &state.photo {
        Some(photo) => doc.photo(center, photo_cy, photo.data_uri()),
        None => doc.photo_placeholder(center, photo_cy),
    }
    y = photo_cy + PHOTO_RADIUS + 20.0;

    // Announcement box.
    let lines = wrap_text(&copy.announcement, ANNOUNCEMENT_CHARS);
    let box_h = lines.len() as f32 * 20.0 + 20.0;
    let _ = write!(
        doc.body,
        r#"<rect x="16" y="{y}" width="{w}" height="{box_h}" rx="20" fill="url(#soft)" stroke="rgba(42,82,152,0.25)" stroke-width="1"/>"#,
        w = CARD_WIDTH - 32.0,
    );
    let mut line_y = y + 24.0;
    for line in &lines {
        doc.text(center, line_y, 14.0, 600, NAVY, line);
        line_y += 20.0;
    }
    y += box_h + 34.0;

    // Name, falling back to the placeholder.
    let name = state
        .display_name()
        .unwrap_or_else(|| copy.name_placeholder.clone());
    for line in wrap_text(&name, NAME_CHARS) {
        doc.text(center, y, 24.0, 700, INK, &line);
        y += 28.0;
    }

    doc.text(center, y, 14.0, 600, SLATE, &copy.role);
    y += 14.0;

    if let Some(location) = state.location_label() {
        let pill_w = (text_width(&location, 15.0) + 40.0).min(CARD_WIDTH * 0.9);
        doc.pill(center, y, pill_w, 34.0, "url(#brand)", Some("rgba(255,255,255,0.3)"));
        doc.text(center, y + 22.0, 15.0, 700, "#ffffff", &location);
    }

    // Footer anchored to the bottom edge.
    let tags_w = text_width(&copy.hashtags, 12.0) + 32.0;
    doc.pill(center, CARD_HEIGHT - 70.0, tags_w, 26.0, "rgba(255,255,255,0.5)", None);
    doc.text(center, CARD_HEIGHT - 53.0, 12.0, 600, NAVY, &copy.hashtags);

    let credit_w = text_width(&copy.credit, 10.0) + 24.0;
    doc.pill(center, CARD_HEIGHT - 36.0, credit_w, 20.0, "rgba(255,255,255,0.3)", None);
    doc.text(center, CARD_HEIGHT - 22.5, 10.0, 500, "#4a5568", &copy.credit);

    CardSvg { svg: doc.finish() }
}

/// Minimal SVG builder for the card layout.
struct SvgDoc {
    body: String,
}

impl SvgDoc {
    fn new() -> Self {
        let mut body = String::with_capacity(4096);
        let _ = write!(
            body,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}" font-family="{FONT_STACK}">"#
        );
        Self { body }
    }

    fn defs(&mut self) {
        let _ = write!(
            self.body,
            concat!(
                "<defs>",
                r##"<linearGradient id="brand" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#1e3c72"/><stop offset="1" stop-color="#2a5298"/></linearGradient>"##,
                r##"<linearGradient id="backdrop" x1="0" y1="0" x2="0.4" y2="1"><stop offset="0" stop-color="#dbe6f5"/><stop offset="0.55" stop-color="#eef3f9"/><stop offset="1" stop-color="#c4d4ea"/></linearGradient>"##,
                r##"<linearGradient id="veil" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="#ffffff" stop-opacity="0.7"/><stop offset="1" stop-color="#ffffff" stop-opacity="0.6"/></linearGradient>"##,
                r##"<linearGradient id="soft" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#1e3c72" stop-opacity="0.15"/><stop offset="1" stop-color="#2a5298" stop-opacity="0.15"/></linearGradient>"##,
                r##"<clipPath id="card-clip"><rect width="{w}" height="{h}" rx="32"/></clipPath>"##,
                r##"<clipPath id="photo-clip"><circle cx="0" cy="0" r="{r}"/></clipPath>"##,
                "</defs>"
            ),
            w = CARD_WIDTH,
            h = CARD_HEIGHT,
            r = PHOTO_RADIUS,
        );
    }

    fn background(&mut self) {
        let _ = write!(
            self.body,
            concat!(
                r##"<g clip-path="url(#card-clip)">"##,
                r##"<rect width="{w}" height="{h}" fill="url(#backdrop)"/>"##,
                r##"<circle cx="330" cy="70" r="120" fill="#2a5298" fill-opacity="0.12"/>"##,
                r##"<circle cx="20" cy="560" r="150" fill="#1e3c72" fill-opacity="0.10"/>"##,
                r##"<circle cx="300" cy="470" r="60" fill="#25d366" fill-opacity="0.08"/>"##,
                r##"<rect width="{w}" height="{h}" fill="url(#veil)"/>"##,
                "</g>"
            ),
            w = CARD_WIDTH,
            h = CARD_HEIGHT,
        );
    }

    /// Rounded pill centered horizontally on `cx`.
    fn pill(&mut self, cx: f32, y: f32, w: f32, h: f32, fill: &str, stroke: Option<&str>) {
        let stroke = stroke
            .map(|s| format!(r#" stroke="{s}" stroke-width="1""#))
            .unwrap_or_default();
        let _ = write!(
            self.body,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" fill="{fill}"{stroke}/>"#,
            x = cx - w / 2.0,
            r = h / 2.0,
        );
    }

    fn text(&mut self, cx: f32, baseline: f32, size: f32, weight: u16, fill: &str, content: &str) {
        let _ = write!(
            self.body,
            r#"<text x="{cx}" y="{baseline}" font-size="{size}" font-weight="{weight}" fill="{fill}" text-anchor="middle">{}</text>"#,
            escape_xml(content)
        );
    }

    fn photo(&mut self, cx: f32, cy: f32, href: &str) {
        let d = PHOTO_RADIUS * 2.0;
        let _ = write!(
            self.body,
            concat!(
                r##"<circle cx="{cx}" cy="{sy}" r="{r}" fill="#000000" fill-opacity="0.18"/>"##,
                r##"<g transform="translate({cx} {cy})"><image x="{o}" y="{o}" width="{d}" height="{d}" preserveAspectRatio="xMidYMid slice" clip-path="url(#photo-clip)" href="{href}"/></g>"##,
                r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="none" stroke="#ffffff" stroke-width="4"/>"##
            ),
            cx = cx,
            cy = cy,
            sy = cy + 6.0,
            r = PHOTO_RADIUS,
            o = -PHOTO_RADIUS,
            d = d,
            href = href,
        );
    }

    fn photo_placeholder(&mut self, cx: f32, cy: f32) {
        let _ = write!(
            self.body,
            concat!(
                r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="#f8fafc" fill-opacity="0.85" stroke="#cbd5e0" stroke-width="3" stroke-dasharray="10 8"/>"##,
                // Camera glyph.
                r##"<rect x="{bx}" y="{by}" width="56" height="38" rx="8" fill="#2a5298"/>"##,
                r##"<rect x="{tx}" y="{ty}" width="18" height="8" rx="3" fill="#2a5298"/>"##,
                r##"<circle cx="{cx}" cy="{ly}" r="11" fill="#f8fafc"/>"##,
                r##"<circle cx="{cx}" cy="{ly}" r="6" fill="#2a5298"/>"##,
            ),
            cx = cx,
            cy = cy,
            r = PHOTO_RADIUS,
            bx = cx - 28.0,
            by = cy - 30.0,
            tx = cx - 9.0,
            ty = cy - 36.0,
            ly = cy - 11.0,
        );
        self.text(cx, cy + 34.0, 13.0, 600, SLATE, "Add your photo");
    }

    fn finish(mut self) -> String {
        self.body.push_str("</svg>");
        self.body
    }
}

/// Rough text width for layout; glyph metrics are not known until rasterization.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}

/// Greedy word wrap on character counts. Overlong words get a line of their own.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Escape text for use inside SVG element content and attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::photo::Photo;

    fn filled_state() -> FormState {
        FormState {
            name: "ahmed sani".into(),
            region_primary: "kano municipal".into(),
            region_secondary: "kano".into(),
            photo: Some(Photo::new("p.png".into(), "image/png".into(), 1, 1, &[0x89, 0x50])),
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let state = filled_state();
        let copy = CardCopy::default();
        assert_eq!(render_card(&state, &copy), render_card(&state, &copy));
    }

    #[test]
    fn shows_normalized_name_and_location() {
        let card = render_card(&filled_state(), &CardCopy::default());
        assert!(card.svg.contains(">Ahmed Sani</text>"));
        assert!(card.svg.contains(">KANO MUNICIPAL, KANO</text>"));
        assert!(card.svg.contains("data:image/png;base64,"));
    }

    #[test]
    fn empty_state_uses_placeholders() {
        let card = render_card(&FormState::default(), &CardCopy::default());
        assert!(card.svg.contains(">Your Name</text>"));
        assert!(card.svg.contains("Add your photo"));
        assert!(!card.svg.contains("<image"));
        assert!(!card.svg.contains("KANO"));
    }

    #[test]
    fn user_text_is_escaped() {
        let state = FormState {
            name: "<script>&\"".into(),
            ..Default::default()
        };
        let card = render_card(&state, &CardCopy::default());
        // The name is title-cased before it is escaped.
        assert!(!card.svg.contains("<Script>"));
        assert!(card.svg.contains("&lt;Script&gt;&amp;&quot;"));
    }

    #[test]
    fn escape_xml_covers_markup_characters() {
        assert_eq!(
            escape_xml(r#"<a href='x'>&"#),
            "&lt;a href=&apos;x&apos;&gt;&amp;"
        );
        assert_eq!(escape_xml("Ahmed Sani"), "Ahmed Sani");
    }

    #[test]
    fn document_has_portrait_aspect() {
        let card = render_card(&FormState::default(), &CardCopy::default());
        assert!(card.svg.starts_with("<svg"));
        assert!(card.svg.ends_with("</svg>"));
        assert!(card.svg.contains(r#"viewBox="0 0 360 640""#));
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("one two three four five six", 9);
        assert_eq!(lines, vec!["one two", "three", "four five", "six"]);
        assert_eq!(wrap_text("supercalifragilistic", 5), vec!["supercalifragilistic"]);
        assert!(wrap_text("   ", 10).is_empty());
    }
}
