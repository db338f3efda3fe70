use crate::error::{AgingReportError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The six semantic roles a source column can be bound to.
///
/// Open-item exports arrive with headers in arbitrary languages and naming
/// conventions; the engine only ever addresses columns through these roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    AmountLocalCurrency,
    DueDate,
    Assignment,
    PostingDate,
    DocumentType,
    CurrencyColumn,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 6] = [
        ColumnRole::AmountLocalCurrency,
        ColumnRole::DueDate,
        ColumnRole::Assignment,
        ColumnRole::PostingDate,
        ColumnRole::DocumentType,
        ColumnRole::CurrencyColumn,
    ];

    /// The mapping key used in serialized role maps and resolver output.
    pub fn key(&self) -> &'static str {
        match self {
            ColumnRole::AmountLocalCurrency => "amount_local_currency",
            ColumnRole::DueDate => "due_date",
            ColumnRole::Assignment => "assignment",
            ColumnRole::PostingDate => "posting_date",
            ColumnRole::DocumentType => "document_type",
            ColumnRole::CurrencyColumn => "currency_column",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Binding from semantic roles to exact source column names, plus the
/// display currency symbol.
///
/// This is the structured-output contract for the external column resolver:
/// the schema descriptions below are surfaced to the LLM via JSON schema so
/// that its answer deserializes directly into this type. Once constructed the
/// mapping is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SemanticColumnMap {
    #[schemars(
        description = "The exact column name that contains the amount in local currency (e.g., 'Betrag in Hauswährung')"
    )]
    pub amount_local_currency: String,

    #[schemars(
        description = "The exact column name that contains the net due date (e.g., 'Nettofälligkeit')"
    )]
    pub due_date: String,

    #[schemars(
        description = "The exact column name that contains the assignment/reference field (e.g., 'Zuordnung')"
    )]
    pub assignment: String,

    #[schemars(
        description = "The exact column name that contains the posting/booking date (e.g., 'Buchungsdatum')"
    )]
    pub posting_date: String,

    #[schemars(
        description = "The exact column name that contains the document type (e.g., 'Belegart')"
    )]
    pub document_type: String,

    #[schemars(
        description = "The exact column name that contains the currency code (e.g., 'Währung')"
    )]
    pub currency_column: String,

    #[schemars(
        description = "The currency symbol derived from the currency code (e.g., '€' for EUR, '$' for USD, '£' for GBP)"
    )]
    pub currency_symbol: String,
}

impl SemanticColumnMap {
    /// Builds a map from a loose `role key -> column name` dictionary, as
    /// produced by callers that carry the mapping as plain JSON. Fails with
    /// [`AgingReportError::MissingRole`] when any of the six roles is absent.
    pub fn from_role_map(roles: &BTreeMap<String, String>, currency_symbol: String) -> Result<Self> {
        let get = |role: ColumnRole| -> Result<String> {
            roles
                .get(role.key())
                .cloned()
                .ok_or(AgingReportError::MissingRole(role))
        };

        Ok(Self {
            amount_local_currency: get(ColumnRole::AmountLocalCurrency)?,
            due_date: get(ColumnRole::DueDate)?,
            assignment: get(ColumnRole::Assignment)?,
            posting_date: get(ColumnRole::PostingDate)?,
            document_type: get(ColumnRole::DocumentType)?,
            currency_column: get(ColumnRole::CurrencyColumn)?,
            currency_symbol,
        })
    }

    pub fn column_for(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::AmountLocalCurrency => &self.amount_local_currency,
            ColumnRole::DueDate => &self.due_date,
            ColumnRole::Assignment => &self.assignment,
            ColumnRole::PostingDate => &self.posting_date,
            ColumnRole::DocumentType => &self.document_type,
            ColumnRole::CurrencyColumn => &self.currency_column,
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SemanticColumnMap)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}
