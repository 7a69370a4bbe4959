//! Currency conversion via frankfurter.app (no API key).

use std::collections::HashMap;

use pprovider::ToolDefinition;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{BuiltinToolsConfig, EXCHANGE_TIMEOUT, endpoint, fetch_text};
use crate::{
    Tool, ToolArgs, ToolError, ToolExecutionContext, ToolFuture, optional_f64, optional_string,
};

const PROVIDER_NAME: &str = "frankfurter.app";

#[derive(Debug, Clone)]
pub struct ExchangeRateTool {
    client: Client,
    base_url: String,
}

impl ExchangeRateTool {
    pub fn new(config: &BuiltinToolsConfig) -> Self {
        Self {
            client: config.client.clone(),
            base_url: config.exchange_base_url.clone(),
        }
    }

    async fn convert(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let query = ExchangeQuery::from_args(args)?;

        let request = self
            .client
            .get(endpoint(&self.base_url, "latest"))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("from", query.base.as_str()), ("to", query.symbol.as_str())]);
        let (status, body) = fetch_text(request, EXCHANGE_TIMEOUT).await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(ToolError::execution(format!(
                "frankfurter http {}: {}",
                status.as_u16(),
                body
            )));
        }

        let payload: RatesPayload = serde_json::from_str(&body)
            .map_err(|err| ToolError::execution(format!("decode error: {err} (body={body})")))?;

        query.render(&payload)
    }
}

impl Tool for ExchangeRateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_exchange_rate".to_string(),
            description: "Get the latest FX rate or convert an amount between two currencies (ISO 4217 codes, e.g., EUR, USD). Powered by frankfurter.app, no API key required.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "base": {
                        "type": "string",
                        "description": "Base currency code (ISO 4217), e.g., EUR"
                    },
                    "symbol": {
                        "type": "string",
                        "description": "Target currency code (ISO 4217), e.g., USD"
                    },
                    "amount": {
                        "type": "number",
                        "description": "Optional amount to convert. If omitted, returns only the rate."
                    }
                },
                "required": ["base", "symbol"]
            }),
        }
    }

    fn invoke<'a>(
        &'a self,
        args: &'a ToolArgs,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(self.convert(args))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ExchangeQuery {
    base: String,
    symbol: String,
    amount: f64,
}

impl ExchangeQuery {
    fn from_args(args: &ToolArgs) -> Result<Self, ToolError> {
        let base = optional_string(args, "base").map(|code| code.to_uppercase());
        let symbol = optional_string(args, "symbol").map(|code| code.to_uppercase());
        let amount = optional_f64(args, "amount").unwrap_or(0.0);

        let (Some(base), Some(symbol)) = (base, symbol) else {
            return Err(ToolError::invalid_arguments("missing 'base' or 'symbol'"));
        };
        if !is_currency_code(&base) || !is_currency_code(&symbol) {
            return Err(ToolError::invalid_arguments(
                "currency codes must be ISO 4217 (3 letters)",
            ));
        }
        if amount < 0.0 {
            return Err(ToolError::invalid_arguments("amount must be >= 0"));
        }

        Ok(Self {
            base,
            symbol,
            amount,
        })
    }

    fn render(&self, payload: &RatesPayload) -> Result<String, ToolError> {
        let rate = payload
            .rates
            .get(&self.symbol)
            .copied()
            .filter(|rate| *rate != 0.0)
            .ok_or_else(|| ToolError::execution(format!("rate not found for {}", self.symbol)))?;

        let mut output = json!({
            "provider": PROVIDER_NAME,
            "base": self.base,
            "symbol": self.symbol,
            "rate": rate,
            "date": payload.date,
        });
        if self.amount > 0.0
            && let Value::Object(map) = &mut output
        {
            map.insert("amount".to_string(), json!(self.amount));
            map.insert("converted".to_string(), json!(self.amount * rate));
        }

        Ok(output.to_string())
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RatesPayload {
    date: String,
    rates: HashMap<String, f64>,
}
