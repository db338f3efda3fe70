use crate::dataset::Cell;
use crate::error::{AgingReportError, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Parses the reporting date from its ISO calendar form. Unlike due-date
/// parsing this is strict: a malformed reporting date aborts the run.
pub fn parse_reporting_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AgingReportError::InvalidReportingDate(date.to_string()))
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Tolerant due-date parsing: native date cells pass through, text cells are
/// tried against the formats these exports actually contain, and anything
/// else yields `None` rather than an error. Data quality issues degrade the
/// row annotation, they never abort the run.
pub fn parse_due_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(text) => parse_date_text(text),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}
