// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Filesystem-safe stems for exported card files.

/// Used when nothing usable survives sanitization.
pub const FALLBACK_STEM: &str = "tag-card";

/// Make a file stem safe to write on Windows and Unix.
///
/// Unicode is transliterated with `deunicode`. ASCII alphanumerics, `-`, `_` and `.`
/// are kept; anything else becomes `_`, and runs of `_` collapse. Trailing dots are
/// dropped, and a stem with nothing but dots or underscores becomes [`FALLBACK_STEM`].
pub fn sanitize_stem(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in deunicode::deunicode(value).chars() {
        let ch = if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            ch
        } else {
            '_'
        };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }

    let trimmed = out.trim_end_matches('.');
    if trimmed.chars().all(|c| c == '.' || c == '_') {
        return FALLBACK_STEM.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_stems_pass_through() {
        assert_eq!(sanitize_stem("nhf-tag-ahmed-sani"), "nhf-tag-ahmed-sani");
        assert_eq!(sanitize_stem("nhf-tag-dr.-ahmed-sani"), "nhf-tag-dr.-ahmed-sani");
    }

    #[test]
    fn accents_are_transliterated() {
        assert_eq!(sanitize_stem("nhf-tag-aminu-dàlhatù"), "nhf-tag-aminu-dalhatu");
    }

    #[test]
    fn punctuation_collapses_to_one_underscore() {
        assert_eq!(sanitize_stem("nhf-tag-o'neil"), "nhf-tag-o_neil");
        assert_eq!(sanitize_stem("a/\\:b"), "a_b");
    }

    #[test]
    fn trailing_dots_are_dropped() {
        assert_eq!(sanitize_stem("nhf-tag-jr."), "nhf-tag-jr");
    }

    #[test]
    fn empty_stems_fall_back() {
        assert_eq!(sanitize_stem(""), FALLBACK_STEM);
        assert_eq!(sanitize_stem("..."), FALLBACK_STEM);
        assert_eq!(sanitize_stem("?!"), FALLBACK_STEM);
    }
}
