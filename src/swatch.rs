//! Preset colors and hex color helpers.
//!
//! Layer colors are free-form strings and are never validated. These helpers
//! exist for front ends that offer a swatch palette or want to warn about a
//! value that is not a hex color.

use palette::Srgb;

/// A named preset color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub hex: &'static str,
}

/// Black, white and the 500 shade of every Tailwind hue.
pub const SWATCHES: &[Swatch] = &[
    Swatch { name: "black", hex: "#000000" },
    Swatch { name: "white", hex: "#ffffff" },
    Swatch { name: "slate", hex: "#64748b" },
    Swatch { name: "gray", hex: "#6b7280" },
    Swatch { name: "zinc", hex: "#71717a" },
    Swatch { name: "neutral", hex: "#737373" },
    Swatch { name: "stone", hex: "#78716c" },
    Swatch { name: "red", hex: "#ef4444" },
    Swatch { name: "orange", hex: "#f97316" },
    Swatch { name: "amber", hex: "#f59e0b" },
    Swatch { name: "yellow", hex: "#eab308" },
    Swatch { name: "lime", hex: "#84cc16" },
    Swatch { name: "green", hex: "#22c55e" },
    Swatch { name: "emerald", hex: "#10b981" },
    Swatch { name: "teal", hex: "#14b8a6" },
    Swatch { name: "cyan", hex: "#06b6d4" },
    Swatch { name: "sky", hex: "#0ea5e9" },
    Swatch { name: "blue", hex: "#3b82f6" },
    Swatch { name: "indigo", hex: "#6366f1" },
    Swatch { name: "violet", hex: "#8b5cf6" },
    Swatch { name: "purple", hex: "#a855f7" },
    Swatch { name: "fuchsia", hex: "#d946ef" },
    Swatch { name: "pink", hex: "#ec4899" },
    Swatch { name: "rose", hex: "#f43f5e" },
];

/// Looks up a swatch by name, case-insensitively.
pub fn find_swatch(name: &str) -> Option<&'static Swatch> {
    SWATCHES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Resolves a user-supplied color: swatch names map to their hex value, hex
/// colors are normalized to lowercase `#rrggbb`, anything else is returned
/// unchanged.
pub fn resolve_color(value: &str) -> String {
    if let Some(swatch) = find_swatch(value) {
        return swatch.hex.to_string();
    }
    match parse_hex(value) {
        Some(color) => to_hex(color),
        None => value.to_string(),
    }
}

/// Parses `#rgb`, `#rrggbb` or the same without the leading `#`.
pub fn parse_hex(value: &str) -> Option<Srgb<u8>> {
    value.trim().parse::<Srgb<u8>>().ok()
}

/// Formats a color as lowercase `#rrggbb`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Formats a color with an alpha as a CSS `rgba()` function.
///
/// Non-hex inputs are returned unchanged.
pub fn to_css_rgba(value: &str, alpha: f32) -> String {
    match parse_hex(value) {
        Some(c) => format!(
            "rgba({},{},{},{})",
            c.red,
            c.green,
            c.blue,
            alpha.clamp(0.0, 1.0)
        ),
        None => value.to_string(),
    }
}
