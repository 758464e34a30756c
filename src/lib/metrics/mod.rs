//! Metrics collection and reporting for umidedup operations.
//!
//! - [`correction`] - UMI correction metrics
//! - [`writer`] - Metrics file I/O utilities

// Re-export core items from umidedup-metrics
pub use umidedup_metrics::{Metric, format_count};

// Re-export submodules for path compatibility (e.g. umidedup_lib::metrics::correction::CorrectionMetrics)
pub use umidedup_metrics::correction;
pub use umidedup_metrics::writer;

// Re-export commonly used types
pub use correction::CorrectionMetrics;
pub use writer::{write_metrics, write_metrics_auto};
