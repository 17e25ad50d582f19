//! Error type for the fallible edges of the crate.
//!
//! Most operations in this crate never fail: unknown icons are skipped,
//! unreadable storage reads as empty, and mutations without a selection are
//! no-ops. The variants below cover the few places where something outside
//! the crate can go wrong: storage writes, JSON encoding and glyph parsing.

use std::path::PathBuf;

/// Errors returned by storage providers, configuration loading and glyph
/// parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A storage provider failed to read or write a record.
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded to or decoded from JSON.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// A glyph document was not a parseable SVG.
    #[error("invalid glyph svg for `{name}`: {source}")]
    InvalidGlyph {
        name: String,
        #[source]
        source: resvg::usvg::Error,
    },

    /// A glyph document parsed but had no `<svg>` root element to unwrap.
    #[error("glyph `{0}` has no <svg> root element")]
    MissingSvgRoot(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
