//! Run configuration for report generation.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use genpdf::{PaperSize, Size};

use crate::error::ReportError;

/// Default file name used when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "StartupXYZ_Client_Report.pdf";

/// Where and how a report is written.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    output_path: PathBuf,
    generated_on: NaiveDate,
    paper_size: Size,
    margin_pt: f64,
}

impl ReportConfig {
    /// Configuration writing to `output_path`, dated today, on A4 with one-inch margins.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            generated_on: Local::now().date_naive(),
            paper_size: PaperSize::A4.into(),
            margin_pt: 72.0,
        }
    }

    /// Destination of the rendered PDF.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Date printed on the cover.
    pub fn generated_on(&self) -> NaiveDate {
        self.generated_on
    }

    /// Page size in millimetres.
    pub fn paper_size(&self) -> Size {
        self.paper_size
    }

    /// Margin on all four sides, in points.
    pub fn margin_pt(&self) -> f64 {
        self.margin_pt
    }

    /// Sets the date printed on the cover and returns the updated configuration.
    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    /// Sets the paper size and returns the updated configuration.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the page margin in points and returns the updated configuration.
    pub fn with_margin_pt(mut self, margin_pt: f64) -> Self {
        self.margin_pt = margin_pt;
        self
    }

    /// Fails when the directory that should receive the report does not exist.
    pub fn check_output_dir(&self) -> Result<(), ReportError> {
        let parent = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => return Ok(()),
        };
        match parent.metadata() {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ReportError::output(
                &self.output_path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} is not a directory", parent.display()),
                ),
            )),
            Err(err) => Err(ReportError::output(&self.output_path, err)),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_FILE)
    }
}
