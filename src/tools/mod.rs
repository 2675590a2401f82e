//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod stock;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use stock::{BuyStocks, GetStockPrice};
pub use tool::{AgentTool, Tool, ToolExecutionContext, ToolOutput};
pub use types::{AgentToolParameters, ParameterBuilder};
pub use validation::{validate_arguments, ArgumentViolation};
