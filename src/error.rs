//! Error type shared by the report assembler, the drawables and the renderer.

use std::io;
use std::path::PathBuf;

use crate::markup::MarkupError;
use crate::paint::PaintError;

/// Errors that can occur while assembling or writing a client report.
#[derive(Debug)]
pub enum ReportError {
    /// A proportion chart was requested with an empty or inconsistent total.
    InvalidProportion {
        /// Number of completed items.
        completed: u32,
        /// Total number of items; must be non-zero and at least `completed`.
        total: u32,
    },
    /// A narrative line of the dataset has malformed inline markup.
    Markup(MarkupError),
    /// No usable font family could be loaded for the layout engine.
    Fonts(genpdf::error::Error),
    /// The layout engine failed while paginating or serializing the document.
    Render(genpdf::error::Error),
    /// Filled and weighted vector paths could not be written into the rendered document.
    Paint(PaintError),
    /// The output file could not be created or written.
    Output {
        /// Destination that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The embedded hyphenation dictionary could not be loaded.
    #[cfg(feature = "hyphenation")]
    Hyphenation(hyphenation::load::Error),
}

impl ReportError {
    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}

impl From<MarkupError> for ReportError {
    fn from(err: MarkupError) -> Self {
        Self::Markup(err)
    }
}

impl From<PaintError> for ReportError {
    fn from(err: PaintError) -> Self {
        Self::Paint(err)
    }
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProportion { completed, total } => write!(
                f,
                "Invalid proportion {completed}/{total}: total must be non-zero and not less than the completed count"
            ),
            Self::Markup(err) => write!(f, "Invalid narrative markup: {err}"),
            Self::Fonts(err) => write!(f, "Failed to load report fonts: {err}"),
            Self::Render(err) => write!(f, "Failed to render report: {err}"),
            Self::Paint(err) => write!(f, "Failed to paint report graphics: {err}"),
            Self::Output { path, .. } => {
                write!(f, "Failed to write report to {}", path.display())
            }
            #[cfg(feature = "hyphenation")]
            Self::Hyphenation(err) => write!(f, "Failed to load hyphenation dictionary: {err}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Markup(err) => Some(err),
            Self::Fonts(err) | Self::Render(err) => Some(err),
            Self::Paint(err) => Some(err),
            Self::Output { source, .. } => Some(source),
            #[cfg(feature = "hyphenation")]
            Self::Hyphenation(err) => Some(err),
            Self::InvalidProportion { .. } => None,
        }
    }
}
