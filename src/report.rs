use crate::classify::{Flag, MaturityCluster, RowAnnotation, CLUSTER_ORDER};
use crate::dataset::Cell;
use serde::{Deserialize, Serialize};

/// Names of the six derived columns appended to the detail table, in their
/// stable output order.
pub const ANNOTATION_HEADERS: [&str; 6] = [
    "Cumulative",
    "Invoice",
    "Credit",
    "Due Date",
    "Maturity",
    "Cluster",
];

/// One source row together with its derived annotation. The cells are an
/// untouched copy of the input; the annotation is computed once and never
/// recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// 0-based position in the source dataset.
    pub row_index: usize,
    pub cells: Vec<Cell>,
    pub annotation: RowAnnotation,
}

impl AnnotatedRow {
    /// 1-based spreadsheet row number, accounting for the header row. Used in
    /// the audit row-number lists.
    pub fn sheet_row(&self) -> usize {
        self.row_index + 2
    }

    /// The six annotation cells in [`ANNOTATION_HEADERS`] order.
    pub fn annotation_cells(&self) -> [Cell; 6] {
        let flag_cell = |flag: Flag| match flag {
            Flag::Active(value) => Cell::Bool(value),
            Flag::Inactive => Cell::Empty,
        };

        [
            flag_cell(self.annotation.cumulative),
            flag_cell(self.annotation.invoice),
            flag_cell(self.annotation.credit),
            self.annotation.due_date.map(Cell::Date).unwrap_or(Cell::Empty),
            self.annotation
                .maturity_days
                .map(|days| Cell::Number(days as f64))
                .unwrap_or(Cell::Empty),
            self.annotation
                .cluster
                .map(|cluster| Cell::Text(cluster.label().to_string()))
                .unwrap_or(Cell::Empty),
        ]
    }
}

/// Per-cluster sum and its share of the respective grand total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClusterBucket {
    pub cluster: MaturityCluster,
    pub total: f64,
    pub percentage: f64,
}

/// The summary aggregation for one run: grand totals, the four-bucket
/// breakdowns for invoices and credits in canonical cluster order, and the
/// three audit row-number lists (1-based spreadsheet rows, dataset order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingSummary {
    pub total_invoice: f64,
    pub total_credit: f64,
    pub invoice_buckets: [ClusterBucket; 4],
    pub credit_buckets: [ClusterBucket; 4],
    pub cumulative_rows: Vec<usize>,
    pub invoice_rows: Vec<usize>,
    pub credit_rows: Vec<usize>,
}

impl AgingSummary {
    /// An all-zero summary, also the result for an empty dataset.
    pub fn empty() -> Self {
        let zero_buckets = CLUSTER_ORDER.map(|cluster| ClusterBucket {
            cluster,
            total: 0.0,
            percentage: 0.0,
        });

        Self {
            total_invoice: 0.0,
            total_credit: 0.0,
            invoice_buckets: zero_buckets,
            credit_buckets: zero_buckets,
            cumulative_rows: Vec::new(),
            invoice_rows: Vec::new(),
            credit_rows: Vec::new(),
        }
    }
}

/// A plain ordered table: headers plus a row-major cell grid, with no
/// formatting metadata attached. Currency formats, widths and sheet
/// visibility are entirely the presentation writer's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Builds the detail table: the original columns followed by the six
/// annotation columns.
pub fn detail_table(source_headers: &[String], rows: &[AnnotatedRow]) -> ReportTable {
    let mut headers: Vec<String> = source_headers.to_vec();
    headers.extend(ANNOTATION_HEADERS.iter().map(|h| h.to_string()));

    let table_rows = rows
        .iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            cells.extend(row.annotation_cells());
            cells
        })
        .collect();

    ReportTable {
        headers,
        rows: table_rows,
    }
}

const SUMMARY_HEADERS: [&str; 11] = [
    "Sum of Invoice Amounts",
    "Sum of Credit Amounts",
    "(Invoice) Maturity Cluster",
    "Total Amount",
    "Percentage",
    "(Credit) Maturity Cluster",
    "Total Amount",
    "Percentage",
    "Cumulative Row Numbers",
    "Invoice Row Numbers",
    "Credit Row Numbers",
];

/// Builds the analysis table in the layout the presentation writer expects:
/// grand totals on the first data row only, one row per cluster for the two
/// breakdowns, and the ragged audit columns padded with empty cells.
pub fn summary_table(summary: &AgingSummary) -> ReportTable {
    let row_count = [
        CLUSTER_ORDER.len(),
        summary.cumulative_rows.len(),
        summary.invoice_rows.len(),
        summary.credit_rows.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    let list_cell = |list: &[usize], i: usize| {
        list.get(i)
            .map(|n| Cell::Number(*n as f64))
            .unwrap_or(Cell::Empty)
    };

    let rows = (0..row_count)
        .map(|i| {
            let (invoice_bucket, credit_bucket) = if i < CLUSTER_ORDER.len() {
                (Some(summary.invoice_buckets[i]), Some(summary.credit_buckets[i]))
            } else {
                (None, None)
            };

            let bucket_cells = |bucket: Option<ClusterBucket>| match bucket {
                Some(b) => [
                    Cell::Text(b.cluster.label().to_string()),
                    Cell::Number(b.total),
                    Cell::Number(b.percentage),
                ],
                None => [Cell::Empty, Cell::Empty, Cell::Empty],
            };

            let mut cells = Vec::with_capacity(SUMMARY_HEADERS.len());
            if i == 0 {
                cells.push(Cell::Number(summary.total_invoice));
                cells.push(Cell::Number(summary.total_credit));
            } else {
                cells.push(Cell::Empty);
                cells.push(Cell::Empty);
            }
            cells.extend(bucket_cells(invoice_bucket));
            cells.extend(bucket_cells(credit_bucket));
            cells.push(list_cell(&summary.cumulative_rows, i));
            cells.push(list_cell(&summary.invoice_rows, i));
            cells.push(list_cell(&summary.credit_rows, i));
            cells
        })
        .collect();

    ReportTable {
        headers: SUMMARY_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}
