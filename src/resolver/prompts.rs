use crate::dataset::Cell;

pub const SEMANTIC_MAPPING_SYSTEM_PROMPT: &str = r#"
You are an expert at analyzing spreadsheets and identifying column structures.

Your task is to examine the column headers of an accounts receivable (A/R)
open-items spreadsheet, typically exported from a German ERP system, and map
them to semantic English keys. You must also identify the currency being used.

## Required Column Mappings

1. **amount_local_currency**: monetary amounts in local currency
   - Common German names: "Betrag in Hauswährung", "Betrag in Belegwährung", "Betrag"
2. **due_date**: the net due date for payments
   - Common German names: "Nettofälligkeit", "Fälligkeitsdatum", "Fälligkeit"
3. **assignment**: assignment or reference information
   - Common German names: "Zuordnung", "Referenz", "Zuordn."
4. **posting_date**: the posting or booking date
   - Common German names: "Buchungsdatum", "Belegdatum", "Datum"
5. **document_type**: the document type classification
   - Common German names: "Belegart", "Dokumenttyp", "Art"
6. **currency_column**: the currency code
   - Common German names: "Währung", "Wahrung", "Currency", "Wäh."

## Currency Symbol Detection

Derive the symbol from the currency code in the sample data:
EUR → €, USD → $, GBP → £, CHF → Fr, JPY → ¥

## Important Notes

- The column names you return must match EXACTLY as they appear in the
  spreadsheet (case-sensitive, including spacing)
- If a header is ambiguous, choose the most likely match based on common
  accounting practice
- Return ONLY valid JSON matching the provided schema
"#;

/// Builds the user message from the actual headers and one sample row (the
/// sample is what lets the model read the currency code).
pub fn build_user_prompt(headers: &[String], sample_row: Option<&[Cell]>) -> String {
    let mut prompt = String::from(
        "Please analyze this spreadsheet and provide the column mappings and \
         currency information.\n\n## Column Headers:\n",
    );
    for header in headers {
        prompt.push_str(&format!("- {}\n", header));
    }

    prompt.push_str("\n## Sample Row (to identify currency):\n");
    match sample_row {
        Some(cells) => {
            for (header, cell) in headers.iter().zip(cells) {
                prompt.push_str(&format!("- {}: {}\n", header, cell));
            }
        }
        None => prompt.push_str("(no data rows available)\n"),
    }

    prompt
}
