//! matriq-report — presentation of finished test reports.
//!
//! Renders a `TestReport` as a self-contained HTML results page or a
//! shareable markdown summary.

pub mod html;
pub mod markdown;
