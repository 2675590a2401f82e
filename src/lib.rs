//! hitl-agent: a tool-calling chat agent that pauses for human approval.
//!
//! A tool that needs sign-off returns [`tools::ToolOutput::Interrupt`]. The
//! [`agent_loop::InterruptController`] checkpoints the thread and hands the
//! prompt back to the caller; [`agent_loop::InterruptController::resume`]
//! replays the call with the human's decision.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use hitl_agent::prelude::*;
//!
//! # async fn example() -> hitl_agent::error::Result<()> {
//! let config = HitlConfig::from_env();
//! let spec: ModelSpec = "groq:llama-3.3-70b-versatile".parse()?;
//! let provider = create_provider(&spec, &config)?;
//! let step = AgentStep::new(provider, ToolRegistry::stock());
//! let controller = InterruptController::new(step, Arc::new(MemoryCheckpointStore::new()))
//!     .with_config(&config);
//!
//! let mut outcome = controller.send("buy_thread", "Buy 10 MSFT stocks at current price.").await?;
//! while let RunOutcome::Suspended { approval } = outcome {
//!     println!("{}", approval.prompt_text);
//!     outcome = controller.resume("buy_thread", "yes").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod agent_loop;
pub mod checkpoint;
pub mod config;
pub mod driver;
pub mod error;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
