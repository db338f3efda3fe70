use crate::classify::{
    annotate_active_row, find_cutoff, CumulativeScan, RowAnnotation, CLUSTER_ORDER,
};
use crate::dataset::{Dataset, ItemView, RoleColumns};
use crate::error::Result;
use crate::report::{AgingSummary, AnnotatedRow, ClusterBucket};
use crate::schema::SemanticColumnMap;
use crate::utils::parse_reporting_date;
use chrono::NaiveDate;
use log::{debug, info, warn};

/// The deterministic classification-and-aggregation engine.
///
/// Pure, single-threaded, no I/O: one cutoff scan, one classification pass
/// with a local running-sum accumulator, one aggregation pass. Concurrent
/// analyses each own their engine and dataset, so no locking is involved.
pub struct AgingEngine {
    reporting_date: NaiveDate,
}

impl AgingEngine {
    pub fn new(reporting_date: NaiveDate) -> Self {
        Self { reporting_date }
    }

    /// Annotates every row in one left-to-right pass. Rows at and after the
    /// general-ledger cutoff get the inactive annotation regardless of what
    /// the classification rules would otherwise produce.
    pub fn annotate(&self, dataset: &Dataset, columns: &RoleColumns) -> Vec<AnnotatedRow> {
        let rows = dataset.rows();
        let stop_index = find_cutoff(rows, columns);
        info!(
            "Cutoff point found at row index {} of {}",
            stop_index,
            rows.len()
        );

        let mut scan = CumulativeScan::new();
        let annotated: Vec<AnnotatedRow> = rows
            .iter()
            .enumerate()
            .map(|(row_index, cells)| {
                let annotation = if row_index < stop_index {
                    let item = ItemView::new(cells, columns);
                    let cumulative = scan.step(&item);
                    annotate_active_row(&item, cumulative, self.reporting_date)
                } else {
                    RowAnnotation::inactive()
                };

                AnnotatedRow {
                    row_index,
                    cells: cells.clone(),
                    annotation,
                }
            })
            .collect();

        debug!(
            "Identified {} cumulative, {} invoice and {} credit rows",
            annotated.iter().filter(|r| r.annotation.cumulative.is_set()).count(),
            annotated.iter().filter(|r| r.annotation.invoice.is_set()).count(),
            annotated.iter().filter(|r| r.annotation.credit.is_set()).count(),
        );

        annotated
    }

    /// Aggregates the annotated rows into the summary: per-cluster sums
    /// reindexed onto the canonical order, grand totals, percentages and the
    /// three audit row-number lists.
    pub fn summarize(&self, rows: &[AnnotatedRow], columns: &RoleColumns) -> AgingSummary {
        let mut summary = AgingSummary::empty();
        let mut invoice_sums = [0.0_f64; 4];
        let mut credit_sums = [0.0_f64; 4];

        for row in rows {
            let annotation = &row.annotation;

            if annotation.cumulative.is_set() {
                summary.cumulative_rows.push(row.sheet_row());
            }

            // Invoice and credit predicates both imply a present amount.
            let amount = row.cells[columns.amount].as_number().unwrap_or(0.0);

            if annotation.invoice.is_set() {
                summary.invoice_rows.push(row.sheet_row());
                if let Some(cluster) = annotation.cluster {
                    invoice_sums[cluster.position()] += amount;
                }
            }
            if annotation.credit.is_set() {
                summary.credit_rows.push(row.sheet_row());
                if let Some(cluster) = annotation.cluster {
                    credit_sums[cluster.position()] += amount;
                }
            }
        }

        summary.total_invoice = invoice_sums.iter().sum();
        summary.total_credit = credit_sums.iter().sum();

        let buckets = |sums: [f64; 4], total: f64| {
            let mut out = [ClusterBucket {
                cluster: CLUSTER_ORDER[0],
                total: 0.0,
                percentage: 0.0,
            }; 4];
            for (i, cluster) in CLUSTER_ORDER.into_iter().enumerate() {
                // A zero grand total reports zero percentages rather than
                // raising a division fault.
                let percentage = if total != 0.0 { sums[i] / total } else { 0.0 };
                out[i] = ClusterBucket {
                    cluster,
                    total: sums[i],
                    percentage,
                };
            }
            out
        };

        summary.invoice_buckets = buckets(invoice_sums, summary.total_invoice);
        summary.credit_buckets = buckets(credit_sums, summary.total_credit);

        info!(
            "Total invoice amount: {}, total credit amount: {}",
            summary.total_invoice, summary.total_credit
        );

        summary
    }
}

/// Engine entry point.
///
/// Validates the reporting date and the column mapping before any row is
/// touched, then runs the classification pass and the aggregation. Either
/// the complete `(annotated rows, summary)` pair comes back or an error;
/// never a partial result.
///
/// An empty dataset yields an empty annotated-row list and an all-zero
/// summary.
pub fn compute_aging_report(
    dataset: &Dataset,
    column_map: &SemanticColumnMap,
    reporting_date: &str,
) -> Result<(Vec<AnnotatedRow>, AgingSummary)> {
    let reporting_date = parse_reporting_date(reporting_date)?;
    let columns = RoleColumns::resolve(dataset, column_map)?;

    info!(
        "Computing aging report for {} rows, reporting date {}",
        dataset.len(),
        reporting_date
    );
    if dataset.is_empty() {
        warn!("Dataset contains no rows; producing an all-zero summary");
    }

    let engine = AgingEngine::new(reporting_date);
    let annotated = engine.annotate(dataset, &columns);
    let summary = engine.summarize(&annotated, &columns);

    Ok((annotated, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Flag, MaturityCluster};
    use crate::dataset::Cell;
    use std::collections::BTreeMap;

    fn map() -> SemanticColumnMap {
        let roles: BTreeMap<String, String> = [
            ("amount_local_currency", "Betrag"),
            ("due_date", "Nettofälligkeit"),
            ("assignment", "Zuordnung"),
            ("posting_date", "Buchungsdatum"),
            ("document_type", "Belegart"),
            ("currency_column", "Währung"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        SemanticColumnMap::from_role_map(&roles, "€".to_string()).unwrap()
    }

    fn headers() -> Vec<String> {
        vec![
            "Betrag".to_string(),
            "Nettofälligkeit".to_string(),
            "Zuordnung".to_string(),
            "Buchungsdatum".to_string(),
            "Belegart".to_string(),
            "Währung".to_string(),
        ]
    }

    fn row(
        amount: Option<f64>,
        due: Cell,
        assignment: Option<&str>,
        posting: Cell,
        doc_type: Cell,
    ) -> Vec<Cell> {
        vec![
            amount.map(Cell::Number).unwrap_or(Cell::Empty),
            due,
            assignment.map(Cell::from).unwrap_or(Cell::Empty),
            posting,
            doc_type,
            Cell::from("EUR"),
        ]
    }

    #[test]
    fn test_cutoff_rows_are_fully_inactive() {
        let dataset = Dataset::new(
            headers(),
            vec![
                row(Some(100.0), Cell::from("2025-05-01"), Some("4711"), Cell::from("x"), Cell::Empty),
                row(Some(100.0), Cell::Empty, Some("Summe Hauptbuchkonto 140000"), Cell::Empty, Cell::Empty),
                // Would classify as an invoice if it were active.
                row(Some(500.0), Cell::from("2025-05-01"), Some("4712"), Cell::from("x"), Cell::Empty),
            ],
        )
        .unwrap();

        let (annotated, summary) = compute_aging_report(&dataset, &map(), "2025-06-10").unwrap();

        for inactive in &annotated[1..] {
            assert_eq!(inactive.annotation.cumulative, Flag::Inactive);
            assert_eq!(inactive.annotation.invoice, Flag::Inactive);
            assert_eq!(inactive.annotation.credit, Flag::Inactive);
            assert_eq!(inactive.annotation.maturity_days, None);
            assert_eq!(inactive.annotation.cluster, None);
        }
        assert_eq!(summary.invoice_rows, vec![2]);
        assert_eq!(summary.total_invoice, 100.0);
    }

    #[test]
    fn test_summary_buckets_and_percentages() {
        let dataset = Dataset::new(
            headers(),
            vec![
                // -40 days: 31-60 bucket.
                row(Some(600.0), Cell::from("2025-05-01"), Some("4711"), Cell::from("x"), Cell::Empty),
                // +5 days: not mature.
                row(Some(400.0), Cell::from("2025-06-15"), Some("4712"), Cell::from("x"), Cell::Empty),
                // -70 days: >60 bucket, credit.
                row(Some(-200.0), Cell::from("2025-04-01"), Some("4713"), Cell::Empty, Cell::from("GS")),
            ],
        )
        .unwrap();

        let (_, summary) = compute_aging_report(&dataset, &map(), "2025-06-10").unwrap();

        assert_eq!(summary.total_invoice, 1000.0);
        assert_eq!(summary.total_credit, -200.0);

        let invoice_totals: Vec<f64> = summary.invoice_buckets.iter().map(|b| b.total).collect();
        assert_eq!(invoice_totals, vec![400.0, 0.0, 600.0, 0.0]);

        let invoice_pcts: Vec<f64> = summary
            .invoice_buckets
            .iter()
            .map(|b| b.percentage)
            .collect();
        assert!((invoice_pcts.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!((invoice_pcts[0] - 0.4).abs() < 1e-9);
        assert!((invoice_pcts[2] - 0.6).abs() < 1e-9);

        assert_eq!(
            summary.credit_buckets[3].cluster,
            MaturityCluster::Over60Days
        );
        assert_eq!(summary.credit_buckets[3].total, -200.0);
        assert!((summary.credit_buckets[3].percentage - 1.0).abs() < 1e-9);

        assert_eq!(summary.invoice_rows, vec![2, 3]);
        assert_eq!(summary.credit_rows, vec![4]);
        assert!(summary.cumulative_rows.is_empty());
    }

    #[test]
    fn test_zero_total_reports_zero_percentages() {
        let dataset = Dataset::new(
            headers(),
            vec![row(
                Some(0.0),
                Cell::from("2025-05-01"),
                Some("4711"),
                Cell::from("x"),
                Cell::Empty,
            )],
        )
        .unwrap();

        let (_, summary) = compute_aging_report(&dataset, &map(), "2025-06-10").unwrap();

        assert_eq!(summary.total_invoice, 0.0);
        let pct_sum: f64 = summary.invoice_buckets.iter().map(|b| b.percentage).sum();
        assert_eq!(pct_sum, 0.0);
    }

    #[test]
    fn test_dual_classified_row_counts_in_both_aggregations() {
        let dataset = Dataset::new(
            headers(),
            vec![row(
                Some(0.0),
                Cell::from("2025-05-01"),
                Some("4711"),
                Cell::from("2025-04-01"),
                Cell::from("RV"),
            )],
        )
        .unwrap();

        let (annotated, summary) = compute_aging_report(&dataset, &map(), "2025-06-10").unwrap();

        assert!(annotated[0].annotation.invoice.is_set());
        assert!(annotated[0].annotation.credit.is_set());
        assert_eq!(summary.invoice_rows, vec![2]);
        assert_eq!(summary.credit_rows, vec![2]);
        // The amount lands in the 31-60 bucket of both breakdowns.
        assert_eq!(summary.invoice_buckets[2].total, 0.0);
        assert_eq!(summary.credit_buckets[2].total, 0.0);
    }

    #[test]
    fn test_empty_dataset_produces_zero_summary() {
        let dataset = Dataset::new(headers(), vec![]).unwrap();
        let (annotated, summary) = compute_aging_report(&dataset, &map(), "2025-06-10").unwrap();

        assert!(annotated.is_empty());
        assert_eq!(summary.total_invoice, 0.0);
        assert_eq!(summary.total_credit, 0.0);
        assert!(summary.invoice_rows.is_empty());
    }

    #[test]
    fn test_malformed_reporting_date_rejected() {
        let dataset = Dataset::new(headers(), vec![]).unwrap();
        let err = compute_aging_report(&dataset, &map(), "10.06.2025").unwrap_err();
        assert!(matches!(
            err,
            crate::error::AgingReportError::InvalidReportingDate(_)
        ));
    }
}
