//! Icon catalog.
//!
//! The catalog is the immutable, name-sorted set of icons a composition can
//! reference. It is built by [`build_catalog`] from raw `(PascalCase name,
//! glyph)` entries, the shape in which glyph libraries expose their icons.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::HashSet;

use resvg::usvg::{Options, Tree, roxmltree};

use crate::error::{Error, Result};
use crate::glyphs::builtin_entries;

/// Source names that are library plumbing rather than icons.
pub const EXCLUDED_NAMES: &[&str] = &["createLucideIcon", "default", "icons", "lazyIcon"];

/// Suffix carried by alias entries that duplicate a shorter canonical name.
pub const ALIAS_SUFFIX: &str = "Icon";

/// Category assigned to every catalog entry.
pub const DEFAULT_CATEGORY: &str = "all";

// ============================================================================
// Glyph
// ============================================================================

/// The renderable body of a 24×24 stroke icon.
///
/// A glyph stores the child elements of the icon's `<svg>` root (paths,
/// circles, ...). Color and stroke width are supplied at render time by
/// [`Glyph::to_svg_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    body: String,
}

impl Glyph {
    /// Creates a glyph from the inner markup of a 24×24 icon.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Creates a glyph from a complete SVG document.
    ///
    /// The document is parsed with usvg to reject malformed markup, then the
    /// children of its root element become the glyph body.
    pub fn from_svg_document(name: &str, svg: &str) -> Result<Self> {
        Tree::from_str(svg, &Options::default()).map_err(|source| Error::InvalidGlyph {
            name: name.to_string(),
            source,
        })?;

        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let document = roxmltree::Document::parse_with_options(svg, options)
            .map_err(|_| Error::MissingSvgRoot(name.to_string()))?;
        let root = document.root_element();
        if root.tag_name().name() != "svg" {
            return Err(Error::MissingSvgRoot(name.to_string()));
        }

        let body = match (root.first_child(), root.last_child()) {
            (Some(first), Some(last)) => &svg[first.range().start..last.range().end],
            _ => "",
        };
        Ok(Self::new(body.trim()))
    }

    /// The inner markup of the glyph.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Renders the glyph as a standalone 24×24 `<svg>` element stroked with
    /// `color` at the fixed glyph stroke width.
    pub fn to_svg_document(&self, color: &str) -> String {
        crate::compose::svg::glyph_markup(self, color)
    }
}

// ============================================================================
// Raw entries
// ============================================================================

/// One entry of an external glyph library, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIconEntry {
    /// PascalCase source name, e.g. `CircleParking`.
    pub name: String,

    /// The glyph, or `None` when the library exposes an empty value.
    pub glyph: Option<Glyph>,
}

impl RawIconEntry {
    pub fn new(name: impl Into<String>, glyph: Option<Glyph>) -> Self {
        Self {
            name: name.into(),
            glyph,
        }
    }
}

// ============================================================================
// IconDefinition
// ============================================================================

/// A selectable icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconDefinition {
    /// Kebab-case identifier, unique within the catalog.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Renderable glyph.
    pub glyph: Glyph,

    /// Always [`DEFAULT_CATEGORY`].
    pub category: String,
}

// ============================================================================
// Name normalization
// ============================================================================

/// Converts a PascalCase source name to a kebab-case identifier.
///
/// A hyphen goes between a lowercase letter or digit and a following
/// uppercase letter; the result is lowercased.
///
/// ```
/// use icon_composer::to_kebab_case;
///
/// assert_eq!(to_kebab_case("CircleParking"), "circle-parking");
/// assert_eq!(to_kebab_case("FilePlus2"), "file-plus2");
/// ```
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if let Some(p) = prev {
            if (p.is_ascii_lowercase() || p.is_ascii_digit()) && c.is_ascii_uppercase() {
                out.push('-');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    out.to_lowercase()
}

/// Converts a PascalCase source name to a display name by putting a space
/// before every uppercase letter.
///
/// Digits never get a leading space, so `FilePlus2` becomes `File Plus2`.
pub fn to_display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out.trim().to_string()
}

/// Locale-style ordering: case-insensitive first, lowercase before uppercase
/// when the names differ only in case.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn is_excluded(name: &str) -> bool {
    EXCLUDED_NAMES.contains(&name) || name.ends_with(ALIAS_SUFFIX)
}

// ============================================================================
// IconCatalog
// ============================================================================

/// The immutable, name-sorted collection of icon definitions.
#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    icons: Vec<IconDefinition>,
    index: HashMap<String, usize>,
}

/// Builds a catalog from raw library entries.
///
/// Plumbing names, `…Icon` aliases and entries without a glyph are dropped.
/// When two names normalize to the same identifier, the one that comes first
/// in `entries` wins. Callers enumerating a library in an unspecified order
/// therefore get an unspecified survivor among colliding names.
pub fn build_catalog(entries: impl IntoIterator<Item = RawIconEntry>) -> IconCatalog {
    let mut seen = HashSet::new();

    let mut icons: Vec<IconDefinition> = entries
        .into_iter()
        .filter(|entry| !is_excluded(&entry.name))
        .filter_map(|entry| {
            let glyph = entry.glyph?;
            Some(IconDefinition {
                id: to_kebab_case(&entry.name),
                name: to_display_name(&entry.name),
                glyph,
                category: DEFAULT_CATEGORY.to_string(),
            })
        })
        .filter(|icon| seen.insert(icon.id.clone()))
        .collect();

    icons.sort_by(|a, b| locale_cmp(&a.name, &b.name));

    let index = icons
        .iter()
        .enumerate()
        .map(|(i, icon)| (icon.id.clone(), i))
        .collect();

    IconCatalog { icons, index }
}

impl IconCatalog {
    /// Builds the catalog from the bundled glyph set.
    pub fn builtin() -> Self {
        build_catalog(builtin_entries())
    }

    /// Finds an icon by identifier.
    pub fn lookup(&self, id: &str) -> Option<&IconDefinition> {
        self.index.get(id).map(|&i| &self.icons[i])
    }

    /// Returns true if the identifier resolves.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Icons whose lowercased name or identifier contains the query.
    ///
    /// An empty query matches every icon. Results keep catalog order.
    pub fn search(&self, query: &str) -> Vec<&IconDefinition> {
        if query.is_empty() {
            return self.icons.iter().collect();
        }
        let lower = query.to_lowercase();
        self.icons
            .iter()
            .filter(|icon| icon.name.to_lowercase().contains(&lower) || icon.id.contains(&lower))
            .collect()
    }

    /// Returns the number of icons.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Iterates icons in name order.
    pub fn iter(&self) -> impl Iterator<Item = &IconDefinition> {
        self.icons.iter()
    }
}

impl<'a> IntoIterator for &'a IconCatalog {
    type Item = &'a IconDefinition;
    type IntoIter = std::slice::Iter<'a, IconDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.icons.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> RawIconEntry {
        RawIconEntry::new(name, Some(Glyph::new(format!("<path d=\"M0 0\" id=\"{name}\"/>"))))
    }

    #[test]
    fn kebab_case_ids() {
        assert_eq!(to_kebab_case("CircleParking"), "circle-parking");
        assert_eq!(to_kebab_case("Square"), "square");
        assert_eq!(to_kebab_case("ArrowUp10"), "arrow-up10");
        assert_eq!(to_kebab_case("Grid2X2"), "grid2-x2");
        assert_eq!(to_kebab_case("X"), "x");
    }

    #[test]
    fn display_names_keep_digit_oddity() {
        assert_eq!(to_display_name("FilePlus2"), "File Plus2");
        assert_eq!(to_display_name("CircleParking"), "Circle Parking");
        assert_eq!(to_display_name("Grid2X2"), "Grid2 X2");
    }

    #[test]
    fn excluded_and_alias_entries_are_dropped() {
        let catalog = build_catalog(vec![
            entry("createLucideIcon"),
            entry("default"),
            entry("icons"),
            entry("lazyIcon"),
            entry("SquareIcon"),
            entry("Square"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup("square").is_some());
        assert!(catalog.lookup("square-icon").is_none());
    }

    #[test]
    fn missing_glyphs_are_skipped() {
        let catalog = build_catalog(vec![RawIconEntry::new("Ghost", None), entry("Circle")]);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains("ghost"));
    }

    #[test]
    fn first_colliding_entry_wins() {
        // Both normalize to `bar-chart`
        let first = RawIconEntry::new("BarChart", Some(Glyph::new("<g id=\"first\"/>")));
        let second = RawIconEntry::new("barChart", Some(Glyph::new("<g id=\"second\"/>")));

        let catalog = build_catalog(vec![first, second]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.lookup("bar-chart").unwrap().glyph.body(),
            "<g id=\"first\"/>"
        );
    }

    #[test]
    fn catalog_is_sorted_by_name() {
        let catalog = build_catalog(vec![entry("Zap"), entry("ArrowRight"), entry("Moon")]);
        let names: Vec<_> = catalog.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Arrow Right", "Moon", "Zap"]);
        assert!(catalog.iter().all(|i| i.category == DEFAULT_CATEGORY));
    }

    #[test]
    fn locale_order_is_case_insensitive() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("Arrow Right", "Arrow"), Ordering::Greater);
    }

    #[test]
    fn search_matches_name_or_id() {
        let catalog = IconCatalog::builtin();

        let hits: Vec<_> = catalog.search("PARK").iter().map(|i| i.id.clone()).collect();
        assert_eq!(hits, vec!["circle-parking"]);

        let hits: Vec<_> = catalog.search("file-plus").iter().map(|i| i.id.clone()).collect();
        assert_eq!(hits, vec!["file-plus2"]);

        assert_eq!(catalog.search("").len(), catalog.len());
        assert!(catalog.search("no such icon").is_empty());
    }

    #[test]
    fn builtin_catalog_resolves_defaults() {
        let catalog = IconCatalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog.contains("square"));
        assert!(catalog.contains("circle"));
        assert_eq!(catalog.lookup("file-plus2").unwrap().name, "File Plus2");
    }

    #[test]
    fn glyph_from_document_keeps_children() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="4"/></svg>"#;
        let glyph = Glyph::from_svg_document("Dot", svg).unwrap();
        assert_eq!(glyph.body(), r#"<circle cx="12" cy="12" r="4"/>"#);
    }

    #[test]
    fn glyph_from_document_ignores_svg_text_before_root() {
        let svg = r#"<?xml version="1.0"?>
<!-- exported from <svg> editor -->
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <path d="M5 12h14"/>
  <!-- </svg> -->
  <path d="M12 5v14"/>
</svg>"#;
        let glyph = Glyph::from_svg_document("Plus", svg).unwrap();
        assert!(glyph.body().starts_with(r#"<path d="M5 12h14"/>"#));
        assert!(glyph.body().ends_with(r#"<path d="M12 5v14"/>"#));
    }

    #[test]
    fn glyph_from_empty_root_has_empty_body() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"/>"#;
        assert_eq!(Glyph::from_svg_document("Blank", svg).unwrap().body(), "");
    }

    #[test]
    fn glyph_from_invalid_document_fails() {
        let err = Glyph::from_svg_document("Broken", "<svg><path").unwrap_err();
        assert!(matches!(err, Error::InvalidGlyph { .. }));
    }
}
