//! JSON report.
//!
//! The format name is accepted so the command line stays stable, but no
//! document layout exists for it yet and the report is empty.

use tracing::warn;

use super::{ReportContent, ReportMeta, ReportRenderer};
use crate::error::Result;

/// JSON renderer placeholder.
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, _meta: &ReportMeta, _content: &ReportContent<'_>) -> Result<String> {
        warn!("JSON report format is not implemented, report is empty");
        Ok(String::new())
    }
}
