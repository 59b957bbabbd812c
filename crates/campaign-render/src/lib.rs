//! # Campaign Render
//!
//! Local artifacts produced around an analysis: the celebration banner, the
//! logo placeholder, re-encoded model images and the PDF report.

pub mod artifacts;
pub mod banner;
pub mod report;

pub use artifacts::ArtifactStore;
pub use banner::{draw_celebration, draw_logo_placeholder};
pub use report::{report_text, ReportExporter, REPORT_TITLE};
