//! Stock tools: a price lookup and an approval-gated purchase.
//!
//! Neither tool talks to a market. Prices come from a fixed table and a
//! purchase only produces a confirmation message.

use async_trait::async_trait;
use serde::Deserialize;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext, ToolOutput};
use super::types::AgentToolParameters;
use crate::error::HitlError;

pub const GET_STOCK_PRICE: &str = "get_stock_price";
pub const BUY_STOCKS: &str = "buy_stocks";

/// Message returned when the human does not approve a purchase.
pub const BUY_DECLINED: &str = "Buying declined.";

/// Fixed price table served by [`GetStockPrice`].
pub const PRICE_TABLE: [(&str, f64); 4] = [
    ("MSFT", 200.3),
    ("AAPL", 100.4),
    ("AMZN", 150.0),
    ("RIL", 87.6),
];

/// Look up a symbol. Unknown symbols are priced at 0.0 rather than treated
/// as errors, so the model can tell the user the symbol is not listed.
pub fn lookup_price(symbol: &str) -> f64 {
    PRICE_TABLE
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, price)| *price)
        .unwrap_or(0.0)
}

/// `true` only for a case-insensitive "yes" after trimming whitespace.
pub fn is_approval(decision: &str) -> bool {
    decision.trim().to_lowercase() == "yes"
}

/// Render a price the way the confirmation message expects: whole values
/// keep one decimal place (`2003.0`), others use the shortest exact form.
pub fn format_price(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Approval prompt shown to the human for a pending purchase.
pub fn approval_prompt(symbol: &str, quantity: i64, total_price: f64) -> String {
    format!("Approve buying {quantity} {symbol} stocks for ${total_price:.2}?")
}

/// Confirmation returned once a purchase is approved.
pub fn purchase_message(symbol: &str, quantity: i64, total_price: f64) -> String {
    format!(
        "You bought {quantity} shares of {symbol} for a total price of {}",
        format_price(total_price)
    )
}

#[derive(Debug, Deserialize)]
struct PriceArgs {
    symbol: String,
}

/// `get_stock_price(symbol) -> number`.
pub struct GetStockPrice {
    parameters: AgentToolParameters,
}

impl GetStockPrice {
    pub fn new() -> Self {
        Self {
            parameters: AgentToolParameters::object()
                .string("symbol", "Ticker symbol, e.g. MSFT", true)
                .build(),
        }
    }
}

impl Default for GetStockPrice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetStockPrice {
    fn name(&self) -> &str {
        GET_STOCK_PRICE
    }

    fn description(&self) -> &str {
        "Return the current price of a stock based on its symbol."
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, HitlError> {
        let PriceArgs { symbol } = args.deserialize()?;
        Ok(ToolOutput::Value(serde_json::json!(lookup_price(&symbol))))
    }
}

#[derive(Debug, Deserialize)]
struct BuyArgs {
    symbol: String,
    quantity: i64,
    total_price: f64,
}

/// `buy_stocks(symbol, quantity, total_price) -> text`, gated on approval.
pub struct BuyStocks {
    parameters: AgentToolParameters,
}

impl BuyStocks {
    pub fn new() -> Self {
        Self {
            parameters: AgentToolParameters::object()
                .string("symbol", "Ticker symbol to buy", true)
                .integer("quantity", "Number of shares", true)
                .number("total_price", "Total price of the order", true)
                .build(),
        }
    }
}

impl Default for BuyStocks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for BuyStocks {
    fn name(&self) -> &str {
        BUY_STOCKS
    }

    fn description(&self) -> &str {
        "Buy stocks. Requires the user's approval before the order is placed."
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, HitlError> {
        let BuyArgs {
            symbol,
            quantity,
            total_price,
        } = args.deserialize()?;

        let Some(decision) = ctx.resume_value() else {
            return Ok(ToolOutput::interrupt(approval_prompt(
                &symbol,
                quantity,
                total_price,
            )));
        };

        if !is_approval(decision) {
            tracing::info!(symbol = %symbol, quantity, "purchase declined");
            return Ok(ToolOutput::Value(serde_json::json!(BUY_DECLINED)));
        }

        let message = purchase_message(&symbol, quantity, total_price);
        tracing::info!(
            thread_id = ctx.thread_id.as_deref().unwrap_or_default(),
            "TOOL EXECUTED: {message}"
        );
        Ok(ToolOutput::Value(serde_json::json!(message)))
    }
}
