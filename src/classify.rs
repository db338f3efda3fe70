use crate::dataset::{Cell, ItemView, RoleColumns};
use crate::utils::parse_due_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assignment marker that starts the trailing general-ledger block. Rows at
/// and after the first occurrence are account-level subtotals and metadata,
/// not transactions, and must not reach classification or aggregation.
pub const CUTOFF_MARKER: &str = "Hauptbuchkonto";

/// Assignment substrings that identify subtotal/summary text.
pub const SUMMARY_MARKERS: [&str; 3] = ["Debitor", "Hauptbuch", "Buchungskreis"];

/// Absolute tolerance when matching a row amount against the running sum.
pub const CUMULATIVE_TOLERANCE: f64 = 0.01;

/// Sentinel maturity for invoice/credit rows whose due date is missing or
/// unparsable. Lands in the "Not mature" bucket through the ordinary
/// cascade; downstream report output depends on that, so it is not special
/// cased there.
pub const MISSING_DUE_DATE_MATURITY: i64 = -6;

/// Tri-state classification flag.
///
/// Rows beyond the general-ledger cutoff are `Inactive` for every derived
/// field; active rows carry a real boolean. Serializes as `true`/`false`/
/// `null` so annotated tables read like the source spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Active(bool),
    Inactive,
}

impl Flag {
    /// True only for `Active(true)`.
    pub fn is_set(&self) -> bool {
        matches!(self, Flag::Active(true))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Flag::Active(_))
    }
}

/// The four canonical aging buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaturityCluster {
    #[serde(rename = "Not mature")]
    NotMature,
    #[serde(rename = "1-30 days")]
    Days1To30,
    #[serde(rename = "31-60 days")]
    Days31To60,
    #[serde(rename = ">60 days")]
    Over60Days,
}

/// Canonical bucket order used everywhere a breakdown is reported.
pub const CLUSTER_ORDER: [MaturityCluster; 4] = [
    MaturityCluster::NotMature,
    MaturityCluster::Days1To30,
    MaturityCluster::Days31To60,
    MaturityCluster::Over60Days,
];

impl MaturityCluster {
    pub fn label(&self) -> &'static str {
        match self {
            MaturityCluster::NotMature => "Not mature",
            MaturityCluster::Days1To30 => "1-30 days",
            MaturityCluster::Days31To60 => "31-60 days",
            MaturityCluster::Over60Days => ">60 days",
        }
    }

    /// Index into [`CLUSTER_ORDER`].
    pub fn position(&self) -> usize {
        match self {
            MaturityCluster::NotMature => 0,
            MaturityCluster::Days1To30 => 1,
            MaturityCluster::Days31To60 => 2,
            MaturityCluster::Over60Days => 3,
        }
    }
}

impl fmt::Display for MaturityCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-row derived fields, computed once in a single pass and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowAnnotation {
    pub cumulative: Flag,
    pub invoice: Flag,
    pub credit: Flag,
    pub due_date: Option<NaiveDate>,
    pub maturity_days: Option<i64>,
    pub cluster: Option<MaturityCluster>,
}

impl RowAnnotation {
    /// Annotation for a row in the inactive trailing region.
    pub fn inactive() -> Self {
        Self {
            cumulative: Flag::Inactive,
            invoice: Flag::Inactive,
            credit: Flag::Inactive,
            due_date: None,
            maturity_days: None,
            cluster: None,
        }
    }
}

/// Index of the first row whose assignment text contains the cutoff marker,
/// or the row count when no such row exists.
pub fn find_cutoff(rows: &[Vec<Cell>], columns: &RoleColumns) -> usize {
    rows.iter()
        .position(|cells| {
            ItemView::new(cells, columns)
                .assignment_text()
                .is_some_and(|text| text.contains(CUTOFF_MARKER))
        })
        .unwrap_or(rows.len())
}

/// Whether the assignment text names a known subtotal category.
pub fn is_summary_text(assignment: Option<&str>) -> bool {
    assignment.is_some_and(|text| SUMMARY_MARKERS.iter().any(|marker| text.contains(marker)))
}

/// Stateful left-to-right subtotal detector.
///
/// A row is cumulative when its amount equals the running sum of the
/// preceding transaction amounts (within tolerance), it has no due date, and
/// its assignment names a subtotal category. Detecting one resets the running
/// total for the next block, which makes the scan order-dependent on purpose.
#[derive(Debug, Default)]
pub struct CumulativeScan {
    running_sum: f64,
}

impl CumulativeScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the scan by one active row and returns its cumulative flag.
    pub fn step(&mut self, item: &ItemView<'_>) -> bool {
        let Some(amount) = item.amount() else {
            return false;
        };

        let matches = item.due_date_cell().is_empty()
            && (amount - self.running_sum).abs() < CUMULATIVE_TOLERANCE
            && self.running_sum != 0.0;
        let cumulative = matches && is_summary_text(item.assignment_text());

        if cumulative {
            self.running_sum = 0.0;
        } else {
            self.running_sum += amount;
        }
        cumulative
    }

    pub fn running_sum(&self) -> f64 {
        self.running_sum
    }
}

/// Invoice predicate: posted and non-negative. Independent of the cumulative
/// and credit flags.
pub fn is_invoice(item: &ItemView<'_>) -> bool {
    item.has_posting_date() && item.amount().is_some_and(|amount| amount >= 0.0)
}

/// Credit predicate: typed document and non-positive amount. A zero-amount
/// row with both fields populated is simultaneously invoice and credit; both
/// aggregations count it.
pub fn is_credit(item: &ItemView<'_>) -> bool {
    item.has_document_type() && item.amount().is_some_and(|amount| amount <= 0.0)
}

/// Signed day offset of the due date from the reporting date for a
/// transactional row. Negative means overdue.
pub fn maturity_days(due_date: Option<NaiveDate>, reporting_date: NaiveDate) -> i64 {
    match due_date {
        Some(due) => (due - reporting_date).num_days(),
        None => MISSING_DUE_DATE_MATURITY,
    }
}

/// Ordered bucket cascade, first match wins. Half-open intervals, so the
/// order of the guards matters; anything at or past the reporting date (and
/// the missing-due-date sentinel) is not mature.
pub fn assign_cluster(maturity_days: i64) -> MaturityCluster {
    if maturity_days < -60 {
        MaturityCluster::Over60Days
    } else if maturity_days < -30 {
        MaturityCluster::Days31To60
    } else if maturity_days < 0 {
        MaturityCluster::Days1To30
    } else {
        MaturityCluster::NotMature
    }
}

/// Annotates one active-region row. The cumulative flag comes from the scan,
/// which the caller advances in dataset order.
pub fn annotate_active_row(
    item: &ItemView<'_>,
    cumulative: bool,
    reporting_date: NaiveDate,
) -> RowAnnotation {
    let invoice = is_invoice(item);
    let credit = is_credit(item);
    let due_date = parse_due_date(item.due_date_cell());

    let (maturity, cluster) = if invoice || credit {
        let days = maturity_days(due_date, reporting_date);
        (Some(days), Some(assign_cluster(days)))
    } else {
        (None, None)
    };

    RowAnnotation {
        cumulative: Flag::Active(cumulative),
        invoice: Flag::Active(invoice),
        credit: Flag::Active(credit),
        due_date,
        maturity_days: maturity,
        cluster,
    }
}
