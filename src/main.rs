//! hitl-agent CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use hitl_agent::agent::AgentStep;
use hitl_agent::agent_loop::{AgentEvent, InterruptController, RunOutcome};
use hitl_agent::checkpoint::MemoryCheckpointStore;
use hitl_agent::cli::{ChatArgs, Cli, Commands, DemoArgs, ModelArgs};
use hitl_agent::config::HitlConfig;
use hitl_agent::driver::{ConsoleInput, Driver, HumanInput};
use hitl_agent::models::ModelSpec;
use hitl_agent::provider::create_provider;
use hitl_agent::tools::ToolRegistry;
use hitl_agent::types::{ModelMessage, Role};
use tracing_subscriber::EnvFilter;

const DEMO_SCRIPT: [&str; 2] = [
    "What is the current price of 10 MSFT stocks?",
    "Buy 10 MSFT stocks at current price.",
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,hitl_agent=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(args).await,
        Commands::Demo(args) => handle_demo(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_controller(
    args: &ModelArgs,
    system: Option<String>,
) -> Result<InterruptController, Box<dyn std::error::Error>> {
    let config = HitlConfig::from_env();
    let spec: ModelSpec = args.model.parse()?;
    let provider = create_provider(&spec, &config)?;

    let mut step = AgentStep::new(provider, ToolRegistry::stock());
    if let Some(system) = system {
        step = step.with_system_prompt(system);
    }

    let sink = Arc::new(|event: AgentEvent| match event {
        AgentEvent::ToolExecutionStart { call, resumed, .. } => {
            let tag = if resumed { " (resumed)" } else { "" };
            eprintln!("⚡ {} ({}){tag}", call.name, call.id);
        }
        AgentEvent::ToolExecutionEnd { result, .. } => {
            let output = truncate(&result.output_text(), 200);
            if result.is_error {
                eprintln!("  ❌ {output}");
            } else {
                eprintln!("  ✅ {output}");
            }
        }
        AgentEvent::ApprovalCanceled { reason, .. } => eprintln!("  ❌ {reason}"),
        _ => {}
    });

    Ok(
        InterruptController::new(step, Arc::new(MemoryCheckpointStore::new()))
            .with_config(&config)
            .with_event_sink(sink),
    )
}

async fn handle_chat(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let thread = args.model.thread.clone();
    let controller = build_controller(&args.model, args.system)?;
    let driver = Driver::new(controller, ConsoleInput::new());

    println!("Chatting on thread '{thread}'. Type 'exit' to quit.");
    loop {
        let Some(line) = driver.human().read_line("\nYou: ").await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        match driver.run_turn(&thread, line).await {
            Ok(report) => println!("Assistant: {}", report.final_message.text()),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(())
}

async fn handle_demo(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let thread = args.model.thread.clone();
    let controller = build_controller(&args.model, None)?;
    let human = ConsoleInput::new();

    println!("--- STEP 1: Price check ---");
    let outcome = controller.send(&thread, DEMO_SCRIPT[0]).await?;
    if let Some(message) = outcome.final_message() {
        println!("Assistant: {}", message.text());
    }

    println!("\n--- STEP 2: Purchase ---");
    let mut outcome = controller.send(&thread, DEMO_SCRIPT[1]).await?;
    while let RunOutcome::Suspended { approval } = outcome {
        let decision = human.ask(&approval.prompt_text).await?;
        outcome = controller.resume(&thread, decision).await?;
    }

    println!("\n--- FINAL OUTPUT ---");
    let history = controller.history(&thread)?;
    for message in history.iter().rev().take(2).rev() {
        print_message(message);
    }
    Ok(())
}

fn print_message(message: &ModelMessage) {
    let label = match message.role {
        Role::Tool => "TOOL",
        Role::Assistant => "ASSISTANT",
        Role::User => "USER",
        Role::System => "SYSTEM",
    };
    println!("[{label}]: {}", message.text());
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
