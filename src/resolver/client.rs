use crate::dataset::Cell;
use crate::error::{AgingReportError, Result};
use crate::resolver::prompts::{build_user_prompt, SEMANTIC_MAPPING_SYSTEM_PROMPT};
use crate::schema::SemanticColumnMap;
use log::{debug, info};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI-backed implementation of the column resolver.
///
/// Temperature is pinned to zero and the response is constrained to the
/// [`SemanticColumnMap`] JSON schema, so for a given export the mapping is
/// reproducible. The resolved column names are still validated against the
/// dataset by the engine, so a hallucinated header fails fast there.
#[derive(Clone)]
pub struct OpenAiResolver {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiResolver {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a compatible alternative endpoint (e.g. a proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolves the six semantic roles and the currency symbol from the raw
    /// headers and one sample row.
    pub async fn resolve_columns(
        &self,
        headers: &[String],
        sample_row: Option<&[Cell]>,
    ) -> Result<SemanticColumnMap> {
        info!(
            "Resolving semantic columns for {} headers via model {}",
            headers.len(),
            self.model
        );

        let schema = serde_json::to_value(SemanticColumnMap::generate_json_schema())?;
        let body = json!({
            "model": self.model,
            "temperature": 0.0,
            "messages": [
                { "role": "system", "content": SEMANTIC_MAPPING_SYSTEM_PROMPT },
                { "role": "user", "content": build_user_prompt(headers, sample_row) },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "semantic_column_map",
                    "schema": schema,
                },
            },
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(AgingReportError::MappingFailed(format!(
                "chat completion failed (status {}): {}",
                status, error_text
            )));
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AgingReportError::MappingFailed("response contains no message content".to_string())
            })?;

        debug!("Raw mapping response: {}", content);

        let map: SemanticColumnMap = serde_json::from_str(content).map_err(|e| {
            AgingReportError::MappingFailed(format!("response did not match schema: {}", e))
        })?;

        info!(
            "Resolved columns: amount='{}', due_date='{}', currency symbol '{}'",
            map.amount_local_currency, map.due_date, map.currency_symbol
        );
        Ok(map)
    }
}
