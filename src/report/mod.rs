// =============================================================================
// Report assembly — formatting, markup, chart embedding, persistence
// =============================================================================

pub mod charts;
pub mod format;
pub mod html;
pub mod markdown;
pub mod sink;

pub use charts::ChartSet;
pub use sink::ReportSink;
