//! Resolves the semantic column mapping for a sample open-items header row.
//!
//! Requires the `openai` feature and an `OPENAI_API_KEY` in the environment
//! (or a `.env` file):
//!
//! ```sh
//! cargo run --example resolve_columns --features openai
//! ```

use ar_aging_builder::resolver::OpenAiResolver;
use ar_aging_builder::Cell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;

    let headers: Vec<String> = [
        "Zuordnung",
        "Belegart",
        "Buchungsdatum",
        "Nettofälligkeit",
        "Betrag in Hauswährung",
        "Währung",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    let sample_row = vec![
        Cell::from("4711-2024"),
        Cell::from("RV"),
        Cell::from("2025-04-01"),
        Cell::from("2025-05-01"),
        Cell::Number(1250.40),
        Cell::from("EUR"),
    ];

    let resolver = OpenAiResolver::new(api_key);
    let map = resolver.resolve_columns(&headers, Some(&sample_row)).await?;

    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}
