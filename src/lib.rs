//! One-shot PDF client status report: a milestone timeline, a completion chart and the
//! narrative sections around them, laid out with `genpdf`.

pub mod builder;
pub mod canvas;
pub mod config;
pub mod drawing;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod markup;
pub mod model;
pub mod paint;
pub mod progress;
pub mod report;
pub mod theme;
pub mod timeline;

pub use config::ReportConfig;
pub use error::ReportError;
pub use report::{generate, ReportData};
