//! # AR Aging Builder
//!
//! A library for turning Accounts Receivable open-item exports into
//! deterministic aging reports: per-row classification (cumulative, invoice,
//! credit), maturity bucketing relative to a reporting date, and a summary
//! aggregation with totals, per-bucket percentages and audit row references.
//!
//! ## Core Concepts
//!
//! - **Role mapping**: an externally resolved binding from six semantic
//!   column roles (amount, due date, assignment, posting date, document type,
//!   currency code) to the exact source column names
//! - **Active region**: rows before the first general-ledger marker in the
//!   assignment column; trailing rows are account subtotals and stay
//!   unclassified
//! - **Cumulative row**: a detected subtotal whose amount matches the running
//!   total of the preceding transactions
//! - **Cluster**: one of four canonical aging buckets assigned to
//!   invoice/credit rows by due-date maturity
//!
//! ## Example
//!
//! ```rust,ignore
//! use ar_aging_builder::*;
//!
//! let dataset = Dataset::new(headers, rows)?;
//! let column_map = SemanticColumnMap::from_role_map(&roles, "€".to_string())?;
//!
//! let (annotated, summary) = compute_aging_report(&dataset, &column_map, "2025-06-10")?;
//!
//! let detail = detail_table(dataset.headers(), &annotated);
//! let analysis = summary_table(&summary);
//! ```
//!
//! The engine performs no I/O: the caller materializes the [`Dataset`] from
//! the source workbook and hands the two output tables to a presentation
//! writer. With the `openai` feature the [`resolver`] module provides an
//! LLM-backed column resolver producing the [`SemanticColumnMap`].

pub mod classify;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod report;
pub mod schema;
pub mod utils;

#[cfg(feature = "openai")]
pub mod resolver;

pub use classify::{
    Flag, MaturityCluster, RowAnnotation, CLUSTER_ORDER, CUTOFF_MARKER, MISSING_DUE_DATE_MATURITY,
    SUMMARY_MARKERS,
};
pub use dataset::{Cell, Dataset, ItemView, RoleColumns};
pub use engine::{compute_aging_report, AgingEngine};
pub use error::{AgingReportError, Result};
pub use report::{
    detail_table, summary_table, AgingSummary, AnnotatedRow, ClusterBucket, ReportTable,
    ANNOTATION_HEADERS,
};
pub use schema::{ColumnRole, SemanticColumnMap};
pub use utils::*;

use log::info;

/// Convenience wrapper around the engine that also builds the two
/// presentation tables.
pub struct AgingReportProcessor;

/// The complete result of one run: the annotated copy of the dataset, the
/// summary aggregation, and the two plain tables a presentation writer
/// consumes.
#[derive(Debug, Clone)]
pub struct AgingReport {
    pub annotated_rows: Vec<AnnotatedRow>,
    pub summary: AgingSummary,
    pub detail: ReportTable,
    pub analysis: ReportTable,
}

impl AgingReportProcessor {
    pub fn process(
        dataset: &Dataset,
        column_map: &SemanticColumnMap,
        reporting_date: &str,
    ) -> Result<AgingReport> {
        info!(
            "Processing aging report with currency symbol '{}'",
            column_map.currency_symbol
        );

        let (annotated_rows, summary) = compute_aging_report(dataset, column_map, reporting_date)?;
        let detail = detail_table(dataset.headers(), &annotated_rows);
        let analysis = summary_table(&summary);

        Ok(AgingReport {
            annotated_rows,
            summary,
            detail,
            analysis,
        })
    }
}
