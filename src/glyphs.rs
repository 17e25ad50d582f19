//! Bundled glyph set.
//!
//! A small selection of 24×24 stroke icons keyed by their PascalCase source
//! names, in the same shape an external glyph library exposes them. Feed
//! these through [`build_catalog`](crate::icon::build_catalog) rather than
//! using them directly.

use crate::icon::{Glyph, RawIconEntry};

const BUILTIN: &[(&str, &str)] = &[
    ("Square", r#"<rect width="18" height="18" x="3" y="3" rx="2"/>"#),
    ("Circle", r#"<circle cx="12" cy="12" r="10"/>"#),
    (
        "Triangle",
        r#"<path d="M13.73 4a2 2 0 0 0-3.46 0l-8 14A2 2 0 0 0 4 21h16a2 2 0 0 0 1.73-3Z"/>"#,
    ),
    (
        "Star",
        r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#,
    ),
    (
        "Heart",
        r#"<path d="M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z"/>"#,
    ),
    (
        "Hexagon",
        r#"<path d="M21 16V8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16z"/>"#,
    ),
    (
        "Diamond",
        r#"<path d="M2.7 10.3a2.41 2.41 0 0 0 0 3.41l7.59 7.59a2.41 2.41 0 0 0 3.41 0l7.59-7.59a2.41 2.41 0 0 0 0-3.41l-7.59-7.59a2.41 2.41 0 0 0-3.41 0Z"/>"#,
    ),
    ("Plus", r#"<path d="M5 12h14"/><path d="M12 5v14"/>"#),
    ("X", r#"<path d="M18 6 6 18"/><path d="m6 6 12 12"/>"#),
    ("Check", r#"<path d="M20 6 9 17l-5-5"/>"#),
    ("ArrowRight", r#"<path d="M5 12h14"/><path d="m12 5 7 7-7 7"/>"#),
    (
        "Sun",
        r#"<circle cx="12" cy="12" r="4"/><path d="M12 2v2"/><path d="M12 20v2"/><path d="m4.93 4.93 1.41 1.41"/><path d="m17.66 17.66 1.41 1.41"/><path d="M2 12h2"/><path d="M20 12h2"/><path d="m6.34 17.66-1.41 1.41"/><path d="m19.07 4.93-1.41 1.41"/>"#,
    ),
    ("Moon", r#"<path d="M12 3a6 6 0 0 0 9 9 9 9 0 1 1-9-9Z"/>"#),
    (
        "Cloud",
        r#"<path d="M17.5 19H9a7 7 0 1 1 6.71-9h1.79a4.5 4.5 0 1 1 0 9Z"/>"#,
    ),
    (
        "Zap",
        r#"<path d="M4 14a1 1 0 0 1-.78-1.63l9.9-10.2a.5.5 0 0 1 .86.46l-1.92 6.02A1 1 0 0 0 13 10h7a1 1 0 0 1 .78 1.63l-9.9 10.2a.5.5 0 0 1-.86-.46l1.92-6.02A1 1 0 0 0 11 14z"/>"#,
    ),
    (
        "House",
        r#"<path d="M15 21v-8a1 1 0 0 0-1-1h-4a1 1 0 0 0-1 1v8"/><path d="M3 10a2 2 0 0 1 .709-1.528l7-5.999a2 2 0 0 1 2.582 0l7 5.999A2 2 0 0 1 21 10v9a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/>"#,
    ),
    (
        "Smile",
        r#"<circle cx="12" cy="12" r="10"/><path d="M8 14s1.5 2 4 2 4-2 4-2"/><line x1="9" x2="9.01" y1="9" y2="9"/><line x1="15" x2="15.01" y1="9" y2="9"/>"#,
    ),
    (
        "CircleParking",
        r#"<circle cx="12" cy="12" r="10"/><path d="M9 17V7h4a3 3 0 0 1 0 6H9"/>"#,
    ),
    (
        "FilePlus2",
        r#"<path d="M4 22h14a2 2 0 0 0 2-2V7l-5-5H6a2 2 0 0 0-2 2v4"/><path d="M14 2v4a2 2 0 0 0 2 2h4"/><path d="M3 15h6"/><path d="M6 12v6"/>"#,
    ),
];

/// Returns the bundled glyphs as raw catalog entries, in source order.
pub fn builtin_entries() -> Vec<RawIconEntry> {
    BUILTIN
        .iter()
        .map(|(name, body)| RawIconEntry::new(*name, Some(Glyph::new(*body))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_glyphs_are_valid_svg() {
        for entry in builtin_entries() {
            let glyph = entry.glyph.expect("builtin glyphs are present");
            let document = glyph.to_svg_document("#000000");
            assert!(
                Glyph::from_svg_document(&entry.name, &document).is_ok(),
                "{} should parse",
                entry.name
            );
        }
    }
}
